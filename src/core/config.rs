//! Configuration management.
//!
//! Configuration is loaded from a TOML file and environment
//! variables, with defaults for every setting. The indexing core
//! never reads configuration itself; callers load a [`Config`] and
//! hand the values over.

use crate::core::error::{IndexerError, Result};
use crate::core::extract::{
    ExtractorRegistry, TextExtractor, WordExtractor, DEFAULT_MAX_FILE_SIZE_MB,
};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Names accepted in `extractors.enabled`
pub const KNOWN_EXTRACTORS: [&str; 2] = [WordExtractor::NAME, TextExtractor::NAME];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub extractors: ExtractorConfig,
}

/// Where documents come from
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Directory scanned for documents
    #[serde(default)]
    pub doc_dir: Option<PathBuf>,
}

/// Index target configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Directory holding the Tantivy index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Tantivy writer heap in MB
    #[serde(default = "default_writer_heap_mb")]
    pub writer_heap_mb: usize,
}

/// Extractor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    /// Extractors to register, in dispatch order
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,

    /// File patterns for the plain-text extractor (glob syntax)
    #[serde(default = "crate::core::extract::text::default_patterns")]
    pub text_patterns: Vec<String>,

    /// File patterns for the Word extractor (glob syntax)
    #[serde(default = "crate::core::extract::word::default_patterns")]
    pub word_patterns: Vec<String>,

    /// Maximum file size in MB (larger files fail extraction)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

// Default value functions
fn default_index_dir() -> PathBuf {
    PathBuf::from("./index")
}

fn default_writer_heap_mb() -> usize {
    50
}

fn default_max_file_size() -> usize {
    DEFAULT_MAX_FILE_SIZE_MB
}

fn default_enabled() -> Vec<String> {
    KNOWN_EXTRACTORS.iter().map(|s| s.to_string()).collect()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            writer_heap_mb: default_writer_heap_mb(),
        }
    }
}

impl IndexConfig {
    pub fn writer_heap_bytes(&self) -> usize {
        self.writer_heap_mb * 1_000_000
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            text_patterns: crate::core::extract::text::default_patterns(),
            word_patterns: crate::core::extract::word::default_patterns(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl ExtractorConfig {
    /// Build the registry described by this configuration
    pub fn build_registry(&self) -> Result<ExtractorRegistry> {
        let mut registry = ExtractorRegistry::new();
        for name in &self.enabled {
            match name.as_str() {
                WordExtractor::NAME => registry.register(WordExtractor::new(
                    &self.word_patterns,
                    self.max_file_size_mb,
                )?),
                TextExtractor::NAME => registry.register(TextExtractor::new(
                    &self.text_patterns,
                    self.max_file_size_mb,
                )?),
                other => {
                    return Err(IndexerError::Configuration(format!(
                        "Unknown extractor '{other}' (known: {})",
                        KNOWN_EXTRACTORS.join(", ")
                    )))
                }
            }
        }
        Ok(registry)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_file(path.as_ref()).map(|(config, _)| config)
    }

    /// Parse a config file; the flag says whether it sets `index.index_dir`
    fn read_file(path: &Path) -> Result<(Self, bool)> {
        let contents = fs::read_to_string(path).map_err(|e| {
            IndexerError::Configuration(format!("Failed to read config file: {e}"))
        })?;

        let table: toml::Table = toml::from_str(&contents)?;
        let sets_index_dir = table
            .get("index")
            .and_then(|index| index.get("index_dir"))
            .is_some();
        let config: Config = toml::Value::Table(table).try_into()?;
        Ok((config, sets_index_dir))
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(explicit, &xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File priority order:
    /// 1. `explicit` path (the CLI `--config` flag)
    /// 2. RECIPE_INDEX_CONFIG env var
    /// 3. XDG config file (~/.config/recipe-index/config.toml)
    /// 4. Defaults
    pub fn load_with_xdg(explicit: Option<&Path>, xdg: &XdgDirs) -> Result<Self> {
        let (mut config, sets_index_dir) = if let Some(path) = explicit {
            Self::read_file(path)?
        } else if let Ok(config_path) = env::var("RECIPE_INDEX_CONFIG") {
            Self::read_file(Path::new(&config_path))?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::read_file(&xdg_config)?
            } else {
                (Self::default(), false)
            }
        };

        // Unless a file names one, the index lives in the XDG data directory
        if !sets_index_dir {
            config.index.index_dir = xdg.index_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(doc_dir) = env::var("RECIPE_INDEX_DOC_DIR") {
            self.source.doc_dir = Some(PathBuf::from(doc_dir));
        }
        if let Ok(index_dir) = env::var("RECIPE_INDEX_INDEX_DIR") {
            self.index.index_dir = PathBuf::from(index_dir);
        }
        if let Ok(heap) = env::var("RECIPE_INDEX_WRITER_HEAP_MB") {
            if let Ok(mb) = heap.parse() {
                self.index.writer_heap_mb = mb;
            }
        }
        if let Ok(max_size) = env::var("RECIPE_INDEX_MAX_FILE_SIZE_MB") {
            if let Ok(size) = max_size.parse() {
                self.extractors.max_file_size_mb = size;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.index.index_dir.as_os_str().is_empty() {
            return Err(IndexerError::Configuration(
                "Index directory must not be empty".to_string(),
            ));
        }

        // Tantivy refuses writer heaps below 15MB
        if self.index.writer_heap_mb < 15 {
            return Err(IndexerError::Configuration(
                "Writer heap must be at least 15 MB".to_string(),
            ));
        }

        if self.extractors.max_file_size_mb == 0 {
            return Err(IndexerError::Configuration(
                "Max file size must be non-zero".to_string(),
            ));
        }

        if self.extractors.enabled.is_empty() {
            return Err(IndexerError::Configuration(
                "At least one extractor must be enabled".to_string(),
            ));
        }

        // Surfaces unknown names and bad patterns
        self.extractors.build_registry()?;

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::debug!("Configuration loaded:");
        tracing::debug!("  Document dir: {:?}", self.source.doc_dir);
        tracing::debug!("  Index dir: {:?}", self.index.index_dir);
        tracing::debug!("  Writer heap: {} MB", self.index.writer_heap_mb);
        tracing::debug!("  Extractors: {:?}", self.extractors.enabled);
        tracing::debug!("  Text patterns: {:?}", self.extractors.text_patterns);
        tracing::debug!("  Word patterns: {:?}", self.extractors.word_patterns);
        tracing::debug!("  Max file size: {} MB", self.extractors.max_file_size_mb);
    }
}

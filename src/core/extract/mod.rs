//! Content extraction.
//!
//! A [`ContentExtractor`] decides from a file name whether it
//! applies, and turns the file into a [`DocumentRecord`]. The
//! [`ExtractorRegistry`] holds the extractors an indexer dispatches
//! to; every extractor that claims a file is run, so two extractors
//! claiming the same file produce two records.

pub(crate) mod text;
pub(crate) mod word;

pub use text::TextExtractor;
pub use word::WordExtractor;

use chrono::{DateTime, Utc};
use glob::{MatchOptions, Pattern};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use crate::core::error::{IndexerError, Result};
use crate::core::types::DocumentRecord;

/// Default size cap applied by the built-in extractors
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Capability implemented by each document format
pub trait ContentExtractor: Send + Sync {
    /// Name used in logs and stored in the `extractor` field
    fn name(&self) -> &str;

    /// Whether this extractor handles the file. Must not touch the
    /// filesystem.
    fn supports(&self, path: &Path) -> bool;

    /// Read the file and build its record
    fn extract(&self, path: &Path) -> Result<DocumentRecord>;
}

/// Ordered set of extractors used by an indexer
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn register<E>(&mut self, extractor: E)
    where
        E: ContentExtractor + 'static,
    {
        self.extractors.push(Box::new(extractor));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<E>(mut self, extractor: E) -> Self
    where
        E: ContentExtractor + 'static,
    {
        self.register(extractor);
        self
    }

    pub fn extractors(&self) -> &[Box<dyn ContentExtractor>] {
        &self.extractors
    }

    /// Extractors that claim the given file, in registration order
    pub fn supporting<'a>(
        &'a self,
        path: &'a Path,
    ) -> impl Iterator<Item = &'a dyn ContentExtractor> + 'a {
        self.extractors
            .iter()
            .map(AsRef::as_ref)
            .filter(move |extractor| extractor.supports(path))
    }

    pub fn names(&self) -> Vec<String> {
        self.extractors.iter().map(|e| e.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorRegistry {
    /// Word and plain-text extractors with default patterns
    fn default() -> Self {
        Self::new()
            .with(WordExtractor::default())
            .with(TextExtractor::default())
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.names())
            .finish()
    }
}

/// Case-insensitive file-name patterns an extractor claims
#[derive(Debug, Clone)]
pub struct FilePatterns {
    patterns: Vec<Pattern>,
}

impl FilePatterns {
    /// Parse glob patterns such as `*.txt`
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| {
                    IndexerError::Configuration(format!("Invalid file pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Match against the file name only
    pub fn matches(&self, path: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        path.file_name()
            .and_then(|f| f.to_str())
            .map(|name| self.patterns.iter().any(|p| p.matches_with(name, options)))
            .unwrap_or(false)
    }
}

/// Read a whole file, refusing files larger than `max_bytes`
pub(crate) fn read_limited(path: &Path, max_bytes: u64, extractor: &str) -> Result<Vec<u8>> {
    let file =
        File::open(path).map_err(|e| IndexerError::extraction(path, extractor, e))?;
    let len = file
        .metadata()
        .map_err(|e| IndexerError::extraction(path, extractor, e))?
        .len();

    if len > max_bytes {
        return Err(IndexerError::extraction(
            path,
            extractor,
            format!("file is {len} bytes, limit is {max_bytes}"),
        ));
    }

    let mut bytes = Vec::with_capacity(len as usize);
    file.take(max_bytes + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| IndexerError::extraction(path, extractor, e))?;
    Ok(bytes)
}

/// Last modification time, when the platform reports one
pub(crate) fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Title derived from the file name when the content has none
pub(crate) fn stem_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn mb_to_bytes(mb: usize) -> u64 {
    (mb as u64) * 1024 * 1024
}

//! XDG Base Directory Support
//!
//! Resolves where the configuration file and the default index live
//! on Linux/Unix systems.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "recipe-index";

/// XDG directory structure for recipe-index
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Create new XDG directory structure with proper resolution order
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit RECIPE_INDEX_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
            data_dir: Self::resolve_data_dir(),
        }
    }

    /// Directories rooted under `root`, ignoring the environment
    pub fn with_root(root: &Path) -> Self {
        Self {
            config_dir: root.join("config").join(APP_DIR),
            data_dir: root.join("data").join(APP_DIR),
        }
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(dir) = env::var("RECIPE_INDEX_CONFIG_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = env::var("RECIPE_INDEX_DATA_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join(APP_DIR);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        // Explicit override
        if let Ok(file) = env::var("RECIPE_INDEX_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Default index location
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Create the config and data directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

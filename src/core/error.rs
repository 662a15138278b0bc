//! Error types and error handling for the indexing pipeline.
//!
//! Errors fall into two groups. Fatal errors (configuration,
//! directory traversal, opening or finalizing the index,
//! cancellation) end a run. Per-document errors (extraction,
//! appending a single record) are reported and skipped by the
//! orchestrator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Main error type for the indexer
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    DirectoryTraversal(#[from] TraversalError),

    #[error("Could not extract {path:?} with {extractor}: {message}")]
    Extraction {
        path: PathBuf,
        extractor: String,
        message: String,
    },

    #[error("Index I/O error: {0}")]
    IndexIO(String),

    #[error("Record for {0:?} has no indexed field")]
    EmptyRecord(PathBuf),

    #[error("Indexing run was cancelled")]
    Cancelled,

    #[error("Indexer is already closed")]
    AlreadyClosed,

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Directory-level failures raised by the walker
#[derive(Error, Debug)]
pub enum TraversalError {
    #[error("{0:?} must be a directory")]
    NotADirectory(PathBuf),

    #[error("Could not list directory {path:?}: {source}")]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexerError {
    /// Build an extraction error for a file/extractor pair
    pub fn extraction(
        path: impl Into<PathBuf>,
        extractor: &str,
        message: impl std::fmt::Display,
    ) -> Self {
        IndexerError::Extraction {
            path: path.into(),
            extractor: extractor.to_string(),
            message: message.to_string(),
        }
    }

    /// Per-document failures the orchestrator logs and skips
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IndexerError::Extraction { .. } | IndexerError::EmptyRecord(_)
        )
    }

    /// Failures that end the current run (or startup)
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Check if this is a traversal (directory-level) error
    pub fn is_traversal(&self) -> bool {
        matches!(self, IndexerError::DirectoryTraversal(_))
    }
}

impl TraversalError {
    /// The directory the failure refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            TraversalError::NotADirectory(path) => path,
            TraversalError::UnreadableDirectory { path, .. } => path,
        }
    }
}

//! Plain-text extractor.

use std::path::Path;

use crate::core::error::{IndexerError, Result};
use crate::core::extract::{
    mb_to_bytes, modified_time, read_limited, stem_title, ContentExtractor, FilePatterns,
    DEFAULT_MAX_FILE_SIZE_MB,
};
use crate::core::types::DocumentRecord;

const MAX_TITLE_CHARS: usize = 256;

/// Indexes UTF-8 text files
#[derive(Debug, Clone)]
pub struct TextExtractor {
    patterns: FilePatterns,
    max_file_size_bytes: u64,
}

impl TextExtractor {
    pub const NAME: &'static str = "text";

    /// Create a text extractor for the given file patterns
    pub fn new(patterns: &[String], max_file_size_mb: usize) -> Result<Self> {
        Ok(Self {
            patterns: FilePatterns::new(patterns)?,
            max_file_size_bytes: mb_to_bytes(max_file_size_mb),
        })
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            patterns: FilePatterns::new(default_patterns())
                .unwrap_or_else(|_| unreachable!("built-in patterns are valid")),
            max_file_size_bytes: mb_to_bytes(DEFAULT_MAX_FILE_SIZE_MB),
        }
    }
}

/// Patterns claimed by default
pub fn default_patterns() -> Vec<String> {
    vec!["*.txt".to_string()]
}

impl ContentExtractor for TextExtractor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, path: &Path) -> bool {
        self.patterns.matches(path)
    }

    fn extract(&self, path: &Path) -> Result<DocumentRecord> {
        let bytes = read_limited(path, self.max_file_size_bytes, Self::NAME)?;
        let body = String::from_utf8(bytes)
            .map_err(|_| IndexerError::extraction(path, Self::NAME, "not valid UTF-8"))?;

        let title = title_from_content(&body).unwrap_or_else(|| stem_title(path));

        Ok(DocumentRecord::standard(
            path,
            Self::NAME,
            title,
            body,
            modified_time(path),
        ))
    }
}

/// First non-blank line, bounded in length
fn title_from_content(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(MAX_TITLE_CHARS).collect())
}

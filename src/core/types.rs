//! Core data types for the indexing pipeline.
//!
//! Document records, field policies, filesystem entries and run
//! statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names of the fields every built-in extractor produces
pub mod fields {
    pub const PATH: &str = "path";
    pub const TITLE: &str = "title";
    pub const BODY: &str = "body";
    pub const EXTRACTOR: &str = "extractor";
    pub const MODIFIED: &str = "modified";
}

/// How a field is handled by the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPolicy {
    /// Value can be retrieved from the index
    pub stored: bool,

    /// Value is searchable
    pub indexed: bool,

    /// Value is split into terms before indexing
    pub tokenized: bool,
}

impl FieldPolicy {
    /// Exact-match identifier (path, extractor name)
    pub const KEYWORD: Self = Self {
        stored: true,
        indexed: true,
        tokenized: false,
    };

    /// Searchable and retrievable text (title)
    pub const TEXT: Self = Self {
        stored: true,
        indexed: true,
        tokenized: true,
    };

    /// Searchable text that is not stored (body)
    pub const FULL_TEXT: Self = Self {
        stored: false,
        indexed: true,
        tokenized: true,
    };

    /// Retrieval only
    pub const STORED: Self = Self {
        stored: true,
        indexed: false,
        tokenized: false,
    };
}

/// A field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Date(_) => None,
        }
    }
}

/// A named field with its value and indexing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    pub policy: FieldPolicy,
}

/// A schema entry: field name, value kind and policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub is_date: bool,
    pub policy: FieldPolicy,
}

/// Fields produced by the built-in extractors, in schema order
pub const STANDARD_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        name: fields::PATH,
        is_date: false,
        policy: FieldPolicy::KEYWORD,
    },
    FieldSpec {
        name: fields::TITLE,
        is_date: false,
        policy: FieldPolicy::TEXT,
    },
    FieldSpec {
        name: fields::BODY,
        is_date: false,
        policy: FieldPolicy::FULL_TEXT,
    },
    FieldSpec {
        name: fields::EXTRACTOR,
        is_date: false,
        policy: FieldPolicy::KEYWORD,
    },
    FieldSpec {
        name: fields::MODIFIED,
        is_date: true,
        policy: FieldPolicy::STORED,
    },
];

/// The structured output of extracting one file
///
/// Records are built once by an extractor and then moved into the
/// accumulator; there is no way to mutate a finished record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    source: PathBuf,
    fields: Vec<Field>,
}

impl DocumentRecord {
    /// Start a record for the given source file
    pub fn builder(source: impl Into<PathBuf>) -> DocumentRecordBuilder {
        DocumentRecordBuilder {
            source: source.into(),
            fields: Vec::new(),
        }
    }

    /// Build a record with the standard field set
    pub fn standard(
        source: &Path,
        extractor: &str,
        title: String,
        body: String,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        let mut builder = Self::builder(source)
            .text(
                fields::PATH,
                source.to_string_lossy().into_owned(),
                FieldPolicy::KEYWORD,
            )
            .text(fields::TITLE, title, FieldPolicy::TEXT)
            .text(fields::BODY, body, FieldPolicy::FULL_TEXT)
            .text(fields::EXTRACTOR, extractor, FieldPolicy::KEYWORD);
        if let Some(modified) = modified {
            builder = builder.date(fields::MODIFIED, modified, FieldPolicy::STORED);
        }
        builder.build()
    }

    /// Path of the file this record was extracted from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// Text value of a field, if present
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// True when at least one field is indexed
    pub fn has_indexed_field(&self) -> bool {
        self.fields.iter().any(|f| f.policy.indexed)
    }
}

/// Builder for [`DocumentRecord`]
#[derive(Debug)]
pub struct DocumentRecordBuilder {
    source: PathBuf,
    fields: Vec<Field>,
}

impl DocumentRecordBuilder {
    pub fn text(mut self, name: &str, value: impl Into<String>, policy: FieldPolicy) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: FieldValue::Text(value.into()),
            policy,
        });
        self
    }

    pub fn date(mut self, name: &str, value: DateTime<Utc>, policy: FieldPolicy) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            value: FieldValue::Date(value),
            policy,
        });
        self
    }

    pub fn build(self) -> DocumentRecord {
        DocumentRecord {
            source: self.source,
            fields: self.fields,
        }
    }
}

/// A directory entry as seen by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Statistics from an indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Directories listed (root included)
    pub directories_scanned: usize,

    /// Non-directory entries visited
    pub files_seen: usize,

    /// Records appended to the index
    pub documents_indexed: usize,

    /// Files no extractor claimed
    pub files_unsupported: usize,

    /// Extraction or append failures (file/extractor pairs)
    pub failures: usize,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}

//! Tantivy integration.
//!
//! `TantivyBackend` implements [`IndexBackend`] on top of a Tantivy
//! index stored in a directory. The schema is derived from the
//! policies of the standard record fields.

use std::path::Path;

use tantivy::schema::{
    DateOptions, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STRING,
};
use tantivy::{Index, IndexWriter, TantivyDocument};

use crate::core::error::{IndexerError, Result};
use crate::core::storage::IndexBackend;
use crate::core::types::{DocumentRecord, FieldSpec, FieldValue, STANDARD_FIELDS};

/// Lowercasing English stemmer registered by default on every index
pub const STEMMED_TOKENIZER: &str = "en_stem";

/// Default writer heap (50MB)
pub const DEFAULT_WRITER_HEAP_BYTES: usize = 50_000_000;

/// Create the Tantivy schema for document records
///
/// Fields:
/// - path: Source file path (STRING | STORED)
/// - title: Document title (stemmed text | STORED)
/// - body: Extracted text (stemmed text)
/// - extractor: Extractor name (STRING | STORED)
/// - modified: File modification time (Date | STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    for spec in STANDARD_FIELDS.iter() {
        if spec.is_date {
            builder.add_date_field(spec.name, date_options(spec));
        } else {
            builder.add_text_field(spec.name, text_options(spec));
        }
    }

    builder.build()
}

fn text_options(spec: &FieldSpec) -> TextOptions {
    let policy = spec.policy;
    let mut options = if policy.indexed && policy.tokenized {
        TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(STEMMED_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        )
    } else if policy.indexed {
        STRING
    } else {
        TextOptions::default()
    };
    if policy.stored {
        options = options.set_stored();
    }
    options
}

fn date_options(spec: &FieldSpec) -> DateOptions {
    let mut options = DateOptions::default();
    if spec.policy.stored {
        options = options.set_stored();
    }
    if spec.policy.indexed {
        options = options.set_indexed();
    }
    options
}

/// Index-writer capability backed by Tantivy
#[derive(Debug, Clone)]
pub struct TantivyBackend {
    /// Writer heap size in bytes
    heap_bytes: usize,
}

/// An open Tantivy index and its single writer
pub struct IndexHandle {
    schema: Schema,
    writer: IndexWriter,
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle")
            .field("schema", &"<schema>")
            .finish()
    }
}

impl TantivyBackend {
    pub fn new(heap_bytes: usize) -> Self {
        Self { heap_bytes }
    }

    /// Number of committed documents in the index at `index_dir`
    pub fn document_count(index_dir: &Path) -> Result<u64> {
        let index = Index::open_in_dir(index_dir)
            .map_err(|e| IndexerError::IndexIO(format!("Failed to open index: {e}")))?;
        let reader = index
            .reader()
            .map_err(|e| IndexerError::IndexIO(format!("Failed to create reader: {e}")))?;
        Ok(reader.searcher().num_docs())
    }

    /// Open the index at `index_dir`, creating it when absent
    fn open_or_create(index_dir: &Path) -> Result<Index> {
        std::fs::create_dir_all(index_dir).map_err(|e| {
            IndexerError::IndexIO(format!("Failed to create index dir {index_dir:?}: {e}"))
        })?;

        if !index_dir.join("meta.json").exists() {
            return Index::create_in_dir(index_dir, create_schema())
                .map_err(|e| IndexerError::IndexIO(format!("Failed to create index: {e}")));
        }

        let index = Index::open_in_dir(index_dir)
            .map_err(|e| IndexerError::IndexIO(format!("Failed to open index: {e}")))?;

        let schema = index.schema();
        if let Some(missing) = STANDARD_FIELDS
            .iter()
            .find(|spec| schema.get_field(spec.name).is_err())
        {
            return Err(IndexerError::IndexIO(format!(
                "Existing index at {index_dir:?} has no '{}' field",
                missing.name
            )));
        }

        Ok(index)
    }
}

impl Default for TantivyBackend {
    fn default() -> Self {
        Self::new(DEFAULT_WRITER_HEAP_BYTES)
    }
}

impl IndexBackend for TantivyBackend {
    type Handle = IndexHandle;

    fn open(&self, index_dir: &Path) -> Result<IndexHandle> {
        let index = Self::open_or_create(index_dir)?;
        let schema = index.schema();

        // Fails with a lock error while another writer holds the index
        let writer = index.writer(self.heap_bytes).map_err(|e| {
            IndexerError::IndexIO(format!("Failed to create writer for {index_dir:?}: {e}"))
        })?;

        Ok(IndexHandle {
            schema,
            writer,
        })
    }

    fn clear_all(&self, handle: &mut IndexHandle) -> Result<()> {
        handle
            .writer
            .delete_all_documents()
            .map_err(|e| IndexerError::IndexIO(format!("Failed to clear index: {e}")))?;
        Ok(())
    }

    fn append(&self, handle: &mut IndexHandle, record: &DocumentRecord) -> Result<()> {
        let mut doc = TantivyDocument::default();

        for field in record.fields() {
            let target = handle.schema.get_field(&field.name).map_err(|e| {
                IndexerError::IndexIO(format!("Unknown field '{}': {e}", field.name))
            })?;
            match &field.value {
                FieldValue::Text(text) => doc.add_text(target, text),
                FieldValue::Date(date) => doc.add_date(
                    target,
                    tantivy::DateTime::from_timestamp_secs(date.timestamp()),
                ),
            }
        }

        handle
            .writer
            .add_document(doc)
            .map_err(|e| IndexerError::IndexIO(format!("Failed to add document: {e}")))?;
        Ok(())
    }

    fn close(&self, mut handle: IndexHandle) -> Result<()> {
        handle
            .writer
            .commit()
            .map_err(|e| IndexerError::IndexIO(format!("Failed to commit: {e}")))?;
        handle
            .writer
            .wait_merging_threads()
            .map_err(|e| IndexerError::IndexIO(format!("Failed to release writer: {e}")))
    }

    fn abandon(&self, mut handle: IndexHandle) {
        if let Err(e) = handle.writer.rollback() {
            tracing::warn!("Rollback failed: {}", e);
        }
    }
}

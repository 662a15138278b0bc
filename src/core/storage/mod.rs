//! Storage layer.
//!
//! The index itself is an external collaborator reached through the
//! [`IndexBackend`] capability. [`IndexAccumulator`] owns the one
//! open handle for a run: it clears the index on open, appends
//! records, and finalizes the handle exactly once.
//!
//! # Index Directory Structure
//!
//! ```text
//! {index_dir}/
//! ├── meta.json               # Tantivy metadata
//! ├── .managed.json
//! ├── .tantivy-writer.lock    # held while a run is open
//! └── [segment files]
//! ```

mod accumulator;
mod tantivy;

use std::path::Path;

use crate::core::error::Result;
use crate::core::types::DocumentRecord;

pub use accumulator::IndexAccumulator;
pub use self::tantivy::{create_schema, IndexHandle, TantivyBackend, DEFAULT_WRITER_HEAP_BYTES};

/// Index-writer capability
///
/// Every failure is reported as `IndexerError::IndexIO`.
pub trait IndexBackend {
    /// Live connection to the index
    type Handle;

    /// Acquire the writer for the index at `path`, creating it if needed
    fn open(&self, path: &Path) -> Result<Self::Handle>;

    /// Delete every document (takes effect at `close`)
    fn clear_all(&self, handle: &mut Self::Handle) -> Result<()>;

    fn append(&self, handle: &mut Self::Handle, record: &DocumentRecord) -> Result<()>;

    /// Flush pending changes and release the writer
    fn close(&self, handle: Self::Handle) -> Result<()>;

    /// Drop pending changes and release the writer
    fn abandon(&self, handle: Self::Handle);
}

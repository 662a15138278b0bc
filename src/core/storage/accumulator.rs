//! Run-scoped owner of the index handle.

use std::path::{Path, PathBuf};

use crate::core::error::{IndexerError, Result};
use crate::core::storage::IndexBackend;
use crate::core::types::DocumentRecord;

/// Appends records to a cleared index and finalizes it once
///
/// A handle still held when the accumulator is dropped is abandoned
/// (pending changes are discarded and the writer released).
pub struct IndexAccumulator<B: IndexBackend> {
    backend: B,
    index_dir: PathBuf,
    handle: Option<B::Handle>,
    appended: usize,
}

impl<B: IndexBackend> IndexAccumulator<B> {
    pub fn new(backend: B, index_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            index_dir: index_dir.into(),
            handle: None,
            appended: 0,
        }
    }

    /// Acquire the writer and clear prior contents
    ///
    /// Opening an already open accumulator is a no-op.
    pub fn open(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let mut handle = self.backend.open(&self.index_dir)?;
        if let Err(e) = self.backend.clear_all(&mut handle) {
            self.backend.abandon(handle);
            return Err(e);
        }

        tracing::debug!("Opened index at {:?} (cleared)", self.index_dir);
        self.handle = Some(handle);
        self.appended = 0;
        Ok(())
    }

    /// Append one record
    ///
    /// Records with no indexed field are rejected with
    /// `EmptyRecord`.
    pub fn append(&mut self, record: DocumentRecord) -> Result<()> {
        if !record.has_indexed_field() {
            return Err(IndexerError::EmptyRecord(record.source().to_path_buf()));
        }

        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| IndexerError::IndexIO("Index is not open".to_string()))?;

        self.backend.append(handle, &record)?;
        self.appended += 1;
        Ok(())
    }

    /// Commit and release the handle; later calls do nothing
    pub fn finalize(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => {
                tracing::debug!(
                    "Finalizing index at {:?} ({} records)",
                    self.index_dir,
                    self.appended
                );
                self.backend.close(handle)
            }
            None => Ok(()),
        }
    }

    /// Discard pending changes and release the handle
    pub fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!("Rolling back index at {:?}", self.index_dir);
            self.backend.abandon(handle);
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Records appended since the last `open`
    pub fn appended(&self) -> usize {
        self.appended
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }
}

impl<B: IndexBackend> Drop for IndexAccumulator<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::warn!(
                "Index at {:?} dropped while open, discarding pending changes",
                self.index_dir
            );
            self.backend.abandon(handle);
        }
    }
}

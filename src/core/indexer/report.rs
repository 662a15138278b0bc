//! Run observers.
//!
//! The orchestrator never logs directly; it calls an
//! [`IndexReporter`]. [`TracingReporter`] is the default and turns
//! events into `tracing` records. [`CollectingReporter`] keeps the
//! events in memory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::core::error::IndexerError;
use crate::core::types::IndexStats;

/// How often the tracing reporter logs progress
const PROGRESS_INTERVAL: usize = 100;

/// Observer for indexing runs. All methods default to no-ops.
pub trait IndexReporter: Send + Sync {
    fn run_started(&self, _doc_dir: &Path) {}

    fn directory_entered(&self, _dir: &Path) {}

    fn document_indexed(&self, _path: &Path, _extractor: &str) {}

    /// No registered extractor claimed the file
    fn file_unsupported(&self, _path: &Path) {}

    /// Extraction or append failed for one file/extractor pair
    fn document_failed(&self, _path: &Path, _extractor: &str, _error: &IndexerError) {}

    fn run_finished(&self, _stats: &IndexStats) {}

    fn run_failed(&self, _error: &IndexerError) {}
}

/// Reporter that emits `tracing` events
#[derive(Debug, Default)]
pub struct TracingReporter {
    indexed: AtomicUsize,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexReporter for TracingReporter {
    fn run_started(&self, doc_dir: &Path) {
        self.indexed.store(0, Ordering::Relaxed);
        tracing::info!("Creating index from {:?}", doc_dir);
    }

    fn directory_entered(&self, dir: &Path) {
        tracing::debug!("Scanning directory {:?}", dir);
    }

    fn document_indexed(&self, path: &Path, extractor: &str) {
        tracing::debug!("Indexed {:?} ({})", path, extractor);

        let count = self.indexed.fetch_add(1, Ordering::Relaxed) + 1;
        if count % PROGRESS_INTERVAL == 0 {
            tracing::info!("Progress: {} documents indexed", count);
        }
    }

    fn file_unsupported(&self, path: &Path) {
        tracing::trace!("No extractor for {:?}", path);
    }

    fn document_failed(&self, path: &Path, extractor: &str, error: &IndexerError) {
        tracing::warn!(
            path = %path.display(),
            extractor,
            "Could not process file: {}",
            error
        );
    }

    fn run_finished(&self, stats: &IndexStats) {
        tracing::info!(
            "Indexing complete: {} documents from {} files ({} unsupported, \
             {} failed) in {}ms",
            stats.documents_indexed,
            stats.files_seen,
            stats.files_unsupported,
            stats.failures,
            stats.duration_ms
        );
    }

    fn run_failed(&self, error: &IndexerError) {
        tracing::error!("Indexing run aborted: {}", error);
    }
}

/// A reported event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    RunStarted(PathBuf),
    DirectoryEntered(PathBuf),
    DocumentIndexed { path: PathBuf, extractor: String },
    FileUnsupported(PathBuf),
    DocumentFailed {
        path: PathBuf,
        extractor: String,
        message: String,
    },
    RunFinished(IndexStats),
    RunFailed(String),
}

/// Reporter that keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events so far
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Files that failed, with the extractor that failed on them
    pub fn failures(&self) -> Vec<(PathBuf, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::DocumentFailed {
                    path, extractor, ..
                } => Some((path, extractor)),
                _ => None,
            })
            .collect()
    }

    /// Files indexed, in order
    pub fn indexed(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::DocumentIndexed { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl IndexReporter for CollectingReporter {
    fn run_started(&self, doc_dir: &Path) {
        self.push(ReportEvent::RunStarted(doc_dir.to_path_buf()));
    }

    fn directory_entered(&self, dir: &Path) {
        self.push(ReportEvent::DirectoryEntered(dir.to_path_buf()));
    }

    fn document_indexed(&self, path: &Path, extractor: &str) {
        self.push(ReportEvent::DocumentIndexed {
            path: path.to_path_buf(),
            extractor: extractor.to_string(),
        });
    }

    fn file_unsupported(&self, path: &Path) {
        self.push(ReportEvent::FileUnsupported(path.to_path_buf()));
    }

    fn document_failed(&self, path: &Path, extractor: &str, error: &IndexerError) {
        self.push(ReportEvent::DocumentFailed {
            path: path.to_path_buf(),
            extractor: extractor.to_string(),
            message: error.to_string(),
        });
    }

    fn run_finished(&self, stats: &IndexStats) {
        self.push(ReportEvent::RunFinished(stats.clone()));
    }

    fn run_failed(&self, error: &IndexerError) {
        self.push(ReportEvent::RunFailed(error.to_string()));
    }
}

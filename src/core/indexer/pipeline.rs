//! Indexing run orchestration.
//!
//! An [`Indexer`] goes through four states:
//!
//! ```text
//! Uninitialized --open()--> Ready --create_index()--> Running --> Closed
//!        |                    |                                    ^
//!        +------------------- close() ----------------------------+
//! ```
//!
//! Construction only validates paths. `open()` acquires the index
//! writer and clears the index; it can fail and be retried.
//! `create_index()` walks the document directory, dispatches every
//! file to every extractor that claims it, and finalizes the index.
//! Per-file failures are reported and skipped; directory failures,
//! cancellation and index open/close failures end the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::core::config::Config;
use crate::core::error::{IndexerError, Result};
use crate::core::extract::ExtractorRegistry;
use crate::core::indexer::report::{IndexReporter, TracingReporter};
use crate::core::indexer::walker::DirectoryWalker;
use crate::core::storage::{IndexAccumulator, IndexBackend, TantivyBackend};
use crate::core::types::IndexStats;

/// Lifecycle state of an [`Indexer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerState {
    /// Configured, index not opened yet
    Uninitialized,
    /// Writer open and prior contents cleared
    Ready,
    /// Walking and dispatching
    Running,
    /// Writer finalized; the indexer cannot run again
    Closed,
}

/// Builds a full-text index from a document directory
pub struct Indexer<B: IndexBackend = TantivyBackend> {
    doc_dir: PathBuf,
    extractors: ExtractorRegistry,
    walker: DirectoryWalker,
    accumulator: IndexAccumulator<B>,
    reporter: Arc<dyn IndexReporter>,
    cancel: CancellationToken,
    state: IndexerState,
}

impl Indexer<TantivyBackend> {
    /// Indexer with the built-in Word and text extractors
    pub fn new(doc_dir: impl Into<PathBuf>, index_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_extractors(doc_dir, index_dir, ExtractorRegistry::default())
    }

    /// Indexer with an explicit set of extractors
    pub fn with_extractors(
        doc_dir: impl Into<PathBuf>,
        index_dir: impl Into<PathBuf>,
        extractors: ExtractorRegistry,
    ) -> Result<Self> {
        Self::with_backend(doc_dir, index_dir, extractors, TantivyBackend::default())
    }

    /// Indexer configured from a loaded [`Config`]
    pub fn from_config(config: &Config) -> Result<Self> {
        let doc_dir = config.source.doc_dir.clone().ok_or_else(|| {
            IndexerError::Configuration("No document directory configured".to_string())
        })?;

        Self::with_backend(
            doc_dir,
            config.index.index_dir.clone(),
            config.extractors.build_registry()?,
            TantivyBackend::new(config.index.writer_heap_bytes()),
        )
    }
}

impl<B: IndexBackend> Indexer<B> {
    /// Indexer over any index backend
    pub fn with_backend(
        doc_dir: impl Into<PathBuf>,
        index_dir: impl Into<PathBuf>,
        extractors: ExtractorRegistry,
        backend: B,
    ) -> Result<Self> {
        let doc_dir = doc_dir.into();
        let index_dir = index_dir.into();
        validate_paths(&doc_dir, &index_dir)?;

        let cancel = CancellationToken::new();

        Ok(Self {
            doc_dir,
            extractors,
            walker: DirectoryWalker::with_cancellation(cancel.clone()),
            accumulator: IndexAccumulator::new(backend, index_dir),
            reporter: Arc::new(TracingReporter::new()),
            cancel,
            state: IndexerState::Uninitialized,
        })
    }

    /// Replace the default tracing reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn IndexReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Stop the run once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.walker = DirectoryWalker::with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Token that cancels this indexer's run
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Acquire the index writer and clear the index
    pub fn open(&mut self) -> Result<()> {
        match self.state {
            IndexerState::Uninitialized => {
                self.accumulator.open()?;
                self.state = IndexerState::Ready;
                Ok(())
            }
            IndexerState::Ready | IndexerState::Running => Ok(()),
            IndexerState::Closed => Err(IndexerError::AlreadyClosed),
        }
    }

    /// Run the whole pipeline and finalize the index
    ///
    /// Opens the index first when [`open`](Self::open) was not called.
    /// The indexer is closed afterwards whatever the outcome.
    pub fn create_index(&mut self) -> Result<IndexStats> {
        if self.state == IndexerState::Closed {
            return Err(IndexerError::AlreadyClosed);
        }
        if let Err(e) = self.open() {
            self.reporter.run_failed(&e);
            return Err(e);
        }

        self.state = IndexerState::Running;
        self.reporter.run_started(&self.doc_dir);
        let start = Instant::now();

        let mut stats = IndexStats::default();
        let walked = {
            let Self {
                doc_dir,
                extractors,
                walker,
                accumulator,
                reporter,
                ..
            } = self;

            walker.walk_entries(doc_dir, |entry| {
                if entry.is_dir {
                    reporter.directory_entered(&entry.path);
                } else {
                    dispatch_file(
                        extractors,
                        accumulator,
                        &**reporter,
                        &entry.path,
                        &mut stats,
                    );
                }
                Ok(())
            })
        };

        self.state = IndexerState::Closed;

        let walk_stats = match walked {
            Ok(walk_stats) => walk_stats,
            Err(e) => {
                self.accumulator.abort();
                self.reporter.run_failed(&e);
                return Err(e);
            }
        };

        if let Err(e) = self.accumulator.finalize() {
            self.reporter.run_failed(&e);
            return Err(e);
        }

        stats.directories_scanned = walk_stats.directories;
        stats.duration_ms = start.elapsed().as_millis() as u64;
        self.reporter.run_finished(&stats);

        Ok(stats)
    }

    /// Finalize the index from any state; a no-op once closed
    pub fn close(&mut self) -> Result<()> {
        if self.state == IndexerState::Closed {
            return Ok(());
        }
        self.state = IndexerState::Closed;
        self.accumulator.finalize()
    }

    pub fn state(&self) -> IndexerState {
        self.state
    }

    /// Directory containing documents to index
    pub fn doc_dir(&self) -> &Path {
        &self.doc_dir
    }

    /// Directory containing the index
    pub fn index_dir(&self) -> &Path {
        self.accumulator.index_dir()
    }

    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }
}

/// Offer one file to every extractor
///
/// Each extractor that claims the file gets its own record, so a file
/// claimed twice is indexed twice.
fn dispatch_file<B: IndexBackend>(
    extractors: &ExtractorRegistry,
    accumulator: &mut IndexAccumulator<B>,
    reporter: &dyn IndexReporter,
    path: &Path,
    stats: &mut IndexStats,
) {
    stats.files_seen += 1;
    let mut claimed = false;

    for extractor in extractors.supporting(path) {
        claimed = true;

        let outcome = extractor
            .extract(path)
            .and_then(|record| accumulator.append(record));

        match outcome {
            Ok(()) => {
                stats.documents_indexed += 1;
                reporter.document_indexed(path, extractor.name());
            }
            Err(e) => {
                stats.failures += 1;
                reporter.document_failed(path, extractor.name(), &e);
            }
        }
    }

    if !claimed {
        stats.files_unsupported += 1;
        reporter.file_unsupported(path);
    }
}

/// Configuration checks done before anything is opened
fn validate_paths(doc_dir: &Path, index_dir: &Path) -> Result<()> {
    if doc_dir.as_os_str().is_empty() {
        return Err(IndexerError::Configuration(
            "Document directory must not be empty".to_string(),
        ));
    }
    if index_dir.as_os_str().is_empty() {
        return Err(IndexerError::Configuration(
            "Index directory must not be empty".to_string(),
        ));
    }
    if !doc_dir.exists() {
        return Err(IndexerError::Configuration(format!(
            "Document directory {doc_dir:?} does not exist"
        )));
    }
    if index_dir.exists() && !index_dir.is_dir() {
        return Err(IndexerError::Configuration(format!(
            "Index path {index_dir:?} is not a directory"
        )));
    }
    Ok(())
}

//! Document indexing module.
//!
//! Walks a document directory, hands every file to the registered
//! extractors and feeds the resulting records to the index.
//!
//! - **walker**: deterministic depth-first directory traversal
//! - **pipeline**: the [`Indexer`] run orchestrator
//! - **report**: run observers (tracing, in-memory)

pub mod pipeline;
pub mod report;
pub mod walker;

pub use pipeline::{Indexer, IndexerState};
pub use report::{CollectingReporter, IndexReporter, ReportEvent, TracingReporter};
pub use walker::{DirectoryWalker, WalkStats};

//! recipe-index - full-text indexing for a directory of recipes
//!
//! Scans a document directory recursively, extracts title and body
//! text from plain-text and legacy Word (`.doc`) files, and writes
//! one record per extracted document into a Tantivy index. Every run
//! rebuilds the index from scratch.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - extract (content extractors)
//!   - storage (Tantivy backend, accumulator)
//!   - indexer (walker, orchestrator, reporters)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Example
//!
//! ```no_run
//! use recipe_index::Indexer;
//!
//! let mut indexer = Indexer::new("/home/cook/recipes", "/tmp/recipe-index")?;
//! let stats = indexer.create_index()?;
//! println!("{} documents", stats.documents_indexed);
//! # Ok::<(), recipe_index::IndexerError>(())
//! ```

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{IndexerError, Result, TraversalError};
pub use core::extract::{ContentExtractor, ExtractorRegistry, TextExtractor, WordExtractor};
pub use core::indexer::{Indexer, IndexerState, IndexReporter};
pub use core::types::{DocumentRecord, IndexStats};

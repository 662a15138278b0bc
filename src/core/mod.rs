//! Core domain logic
//!
//! Everything here is independent of the command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Document records, field policies, run statistics
//! - **xdg**: XDG directory handling
//! - **extract**: Content extractors (plain text, legacy Word)
//! - **storage**: Index backend and run-scoped accumulator
//! - **indexer**: Directory walking and run orchestration

pub mod config;
pub mod error;
pub mod extract;
pub mod indexer;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{IndexerError, Result, TraversalError};
pub use indexer::{Indexer, IndexerState};

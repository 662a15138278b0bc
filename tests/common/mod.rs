// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{legacy_doc_bytes, TestDocs};
#[allow(unused_imports)]
pub use helpers::{indexed_paths, run_indexer, search_paths};

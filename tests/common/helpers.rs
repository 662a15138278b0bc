// Test helper functions

use recipe_index::core::error::Result;
use recipe_index::core::indexer::{CollectingReporter, Indexer};
use recipe_index::core::types::IndexStats;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{AllQuery, QueryParser};
use tantivy::schema::Value;
use tantivy::{Index, TantivyDocument};

/// Run a default indexer, collecting every reported event
#[allow(dead_code)] // Used in integration tests
pub fn run_indexer(
    doc_dir: &Path,
    index_dir: &Path,
) -> (Result<IndexStats>, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let mut indexer = Indexer::new(doc_dir, index_dir)
        .unwrap()
        .with_reporter(reporter.clone());
    (indexer.create_index(), reporter)
}

/// Source paths of the documents matching `query` (title and body)
#[allow(dead_code)] // Used in integration tests
pub fn search_paths(index_dir: &Path, query: &str) -> Vec<PathBuf> {
    let index = Index::open_in_dir(index_dir).unwrap();
    let schema = index.schema();
    let title = schema.get_field("title").unwrap();
    let body = schema.get_field("body").unwrap();

    let parser = QueryParser::for_index(&index, vec![title, body]);
    let query = parser.parse_query(query).unwrap();
    collect_paths(&index, &query)
}

/// Source paths of every document in the index, sorted
#[allow(dead_code)] // Used in integration tests
pub fn indexed_paths(index_dir: &Path) -> Vec<PathBuf> {
    let index = Index::open_in_dir(index_dir).unwrap();
    let mut paths = collect_paths(&index, &AllQuery);
    paths.sort();
    paths
}

fn collect_paths(index: &Index, query: &dyn tantivy::query::Query) -> Vec<PathBuf> {
    let path = index.schema().get_field("path").unwrap();
    let searcher = index.reader().unwrap().searcher();

    searcher
        .search(query, &TopDocs::with_limit(1000))
        .unwrap()
        .into_iter()
        .map(|(_score, address)| {
            let doc: TantivyDocument = searcher.doc(address).unwrap();
            PathBuf::from(doc.get_first(path).and_then(|v| v.as_str()).unwrap())
        })
        .collect()
}

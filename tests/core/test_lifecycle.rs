// Integration tests for the indexer lifecycle

use crate::common::{run_indexer, TestDocs};
use recipe_index::core::config::Config;
use recipe_index::core::error::IndexerError;
use recipe_index::core::indexer::{Indexer, IndexerState};
use recipe_index::core::storage::TantivyBackend;
use tokio_util::sync::CancellationToken;

#[test]
fn test_create_index_closes_indexer() {
    let docs = TestDocs::recipes();
    let mut indexer = Indexer::new(docs.doc_dir(), docs.index_dir()).unwrap();
    assert_eq!(indexer.state(), IndexerState::Uninitialized);

    indexer.create_index().unwrap();

    assert_eq!(indexer.state(), IndexerState::Closed);
    assert!(matches!(
        indexer.create_index(),
        Err(IndexerError::AlreadyClosed)
    ));
}

#[test]
fn test_close_twice_is_harmless() {
    let docs = TestDocs::recipes();
    let mut indexer = Indexer::new(docs.doc_dir(), docs.index_dir()).unwrap();

    indexer.create_index().unwrap();
    indexer.close().unwrap();
    indexer.close().unwrap();

    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 3);
}

#[test]
fn test_close_after_open_leaves_empty_index() {
    let docs = TestDocs::recipes();
    let (first, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    first.unwrap();

    let mut indexer = Indexer::new(docs.doc_dir(), docs.index_dir()).unwrap();
    indexer.open().unwrap();
    assert_eq!(indexer.state(), IndexerState::Ready);
    indexer.close().unwrap();

    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 0);
}

#[test]
fn test_second_writer_is_rejected() {
    let docs = TestDocs::recipes();
    let mut holder = Indexer::new(docs.doc_dir(), docs.index_dir()).unwrap();
    holder.open().unwrap();

    let (result, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    assert!(matches!(result, Err(IndexerError::IndexIO(_))));

    holder.close().unwrap();
    let (retry, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    assert_eq!(retry.unwrap().documents_indexed, 3);
}

#[test]
fn test_cancelled_run_keeps_previous_index() {
    let docs = TestDocs::recipes();
    let (first, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    first.unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let mut indexer = Indexer::new(docs.doc_dir(), docs.index_dir())
        .unwrap()
        .with_cancellation(token);

    assert!(matches!(
        indexer.create_index(),
        Err(IndexerError::Cancelled)
    ));
    assert_eq!(indexer.state(), IndexerState::Closed);
    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 3);
}

#[test]
fn test_indexer_from_config() {
    let docs = TestDocs::recipes();
    let mut config = Config::default();
    config.source.doc_dir = Some(docs.doc_dir().to_path_buf());
    config.index.index_dir = docs.index_dir();
    config.extractors.enabled = vec!["text".to_string()];

    let mut indexer = Indexer::from_config(&config).unwrap();
    assert_eq!(indexer.extractors().names(), vec!["text"]);

    let stats = indexer.create_index().unwrap();
    assert_eq!(stats.documents_indexed, 2);
}

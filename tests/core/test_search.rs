// Indexed content is searchable

use crate::common::{run_indexer, search_paths, TestDocs};

#[test]
fn test_text_body_is_searchable() {
    let docs = TestDocs::recipes();
    let (result, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    result.unwrap();

    assert_eq!(
        search_paths(&docs.index_dir(), "basil"),
        vec![docs.path("soups/tomato.txt")]
    );
}

#[test]
fn test_word_body_is_searchable() {
    let docs = TestDocs::recipes();
    let (result, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    result.unwrap();

    assert_eq!(
        search_paths(&docs.index_dir(), "custard"),
        vec![docs.path("desserts/flan.doc")]
    );
}

#[test]
fn test_title_is_searchable() {
    let docs = TestDocs::recipes();
    let (result, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    result.unwrap();

    assert_eq!(
        search_paths(&docs.index_dir(), "title:sourdough"),
        vec![docs.path("bread.txt")]
    );
}

#[test]
fn test_no_match_for_missing_term() {
    let docs = TestDocs::recipes();
    let (result, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    result.unwrap();

    assert!(search_paths(&docs.index_dir(), "anchovies").is_empty());
}

#[test]
fn test_plural_query_matches_singular_text() {
    let docs = TestDocs::recipes();
    let (result, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    result.unwrap();

    assert_eq!(
        search_paths(&docs.index_dir(), "tomatoes"),
        vec![docs.path("soups/tomato.txt")]
    );
    assert_eq!(
        search_paths(&docs.index_dir(), "custards"),
        vec![docs.path("desserts/flan.doc")]
    );
}

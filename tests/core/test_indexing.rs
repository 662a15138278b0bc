// Integration tests for indexing runs

use crate::common::{indexed_paths, run_indexer, TestDocs};
use recipe_index::core::error::{IndexerError, TraversalError};
use recipe_index::core::extract::{ExtractorRegistry, TextExtractor, WordExtractor};
use recipe_index::core::indexer::{CollectingReporter, Indexer, ReportEvent};
use recipe_index::core::storage::TantivyBackend;
use std::sync::Arc;

#[test]
fn test_text_and_word_documents_indexed() {
    let docs = TestDocs::new()
        .with_text("notes.txt", "Weeknight notes\nBuy saffron.")
        .with_doc("report.doc", "Quarterly pantry report")
        .with_dir("empty");

    let (result, reporter) = run_indexer(docs.doc_dir(), &docs.index_dir());
    let stats = result.unwrap();

    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(stats.files_seen, 2);
    assert_eq!(stats.directories_scanned, 2);
    assert_eq!(stats.failures, 0);
    assert!(reporter.failures().is_empty());
    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 2);
}

#[test]
fn test_empty_directory_gives_empty_index() {
    let docs = TestDocs::new();

    let (result, _) = run_indexer(docs.doc_dir(), &docs.index_dir());

    assert_eq!(result.unwrap().documents_indexed, 0);
    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 0);
}

#[test]
fn test_corrupt_doc_is_skipped_with_warning() {
    let docs = TestDocs::new()
        .with_text("notes.txt", "Notes")
        .with_bytes("corrupt.doc", b"this is not a compound file");

    let (result, reporter) = run_indexer(docs.doc_dir(), &docs.index_dir());
    let stats = result.unwrap();

    assert_eq!(stats.documents_indexed, 1);
    assert_eq!(stats.failures, 1);
    assert_eq!(
        reporter.failures(),
        vec![(docs.path("corrupt.doc"), "word".to_string())]
    );
    assert_eq!(indexed_paths(&docs.index_dir()), vec![docs.path("notes.txt")]);
}

#[test]
fn test_failures_do_not_affect_sibling_directories() {
    let docs = TestDocs::new()
        .with_bytes("a/broken.txt", &[0xFF, 0xFE, 0x00, 0xC3])
        .with_bytes("a/broken.doc", &[0xD0, 0xCF, 0x11])
        .with_text("b/good.txt", "Good recipe")
        .with_text("c/also-good.txt", "Another good recipe");

    let (result, reporter) = run_indexer(docs.doc_dir(), &docs.index_dir());
    let stats = result.unwrap();

    assert_eq!(stats.failures, 2);
    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(
        indexed_paths(&docs.index_dir()),
        vec![docs.path("b/good.txt"), docs.path("c/also-good.txt")]
    );
    assert_eq!(reporter.failures().len(), 2);
}

#[test]
fn test_unsupported_files_are_not_indexed() {
    let docs = TestDocs::new()
        .with_text("recipe.txt", "Pancakes")
        .with_text("photo.jpg", "not really a photo")
        .with_text("recipe.docx", "newer format");

    let (result, reporter) = run_indexer(docs.doc_dir(), &docs.index_dir());
    let stats = result.unwrap();

    assert_eq!(stats.files_seen, 3);
    assert_eq!(stats.files_unsupported, 2);
    assert_eq!(stats.documents_indexed, 1);
    assert_eq!(stats.failures, 0);

    let unsupported = reporter
        .events()
        .into_iter()
        .filter(|event| matches!(event, ReportEvent::FileUnsupported(_)))
        .count();
    assert_eq!(unsupported, 2);
}

#[test]
fn test_every_file_visited_once_in_walk_order() {
    let docs = TestDocs::new()
        .with_text("z.txt", "z")
        .with_text("b/inner.txt", "inner")
        .with_text("a/deep/deeper.txt", "deeper")
        .with_text("a/first.txt", "first")
        .with_text("m.txt", "m");

    let (result, reporter) = run_indexer(docs.doc_dir(), &docs.index_dir());
    result.unwrap();

    assert_eq!(
        reporter.indexed(),
        vec![
            docs.path("m.txt"),
            docs.path("z.txt"),
            docs.path("a/first.txt"),
            docs.path("a/deep/deeper.txt"),
            docs.path("b/inner.txt"),
        ]
    );
}

#[test]
fn test_rerun_replaces_previous_contents() {
    let docs = TestDocs::recipes();

    let (first, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    first.unwrap();
    let (second, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    second.unwrap();

    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 3);

    std::fs::remove_file(docs.path("bread.txt")).unwrap();
    let (third, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    third.unwrap();

    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 2);
}

#[test]
fn test_root_is_file_keeps_previous_index() {
    let docs = TestDocs::recipes();
    let (first, _) = run_indexer(docs.doc_dir(), &docs.index_dir());
    first.unwrap();

    let (result, reporter) = run_indexer(&docs.path("bread.txt"), &docs.index_dir());

    assert!(matches!(
        result,
        Err(IndexerError::DirectoryTraversal(
            TraversalError::NotADirectory(_)
        ))
    ));
    assert!(matches!(
        reporter.events().last(),
        Some(ReportEvent::RunFailed(_))
    ));
    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 3);
}

#[test]
fn test_file_claimed_twice_is_indexed_twice() {
    let docs = TestDocs::new().with_text("menu.txt", "Tasting menu");
    let registry = ExtractorRegistry::new()
        .with(TextExtractor::default())
        .with(TextExtractor::new(&["menu.*".to_string()], 10).unwrap());

    let reporter = Arc::new(CollectingReporter::new());
    let mut indexer = Indexer::with_extractors(docs.doc_dir(), docs.index_dir(), registry)
        .unwrap()
        .with_reporter(reporter.clone());
    let stats = indexer.create_index().unwrap();

    assert_eq!(stats.files_seen, 1);
    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(reporter.indexed().len(), 2);
    assert_eq!(TantivyBackend::document_count(&docs.index_dir()).unwrap(), 2);
}

#[test]
fn test_oversized_file_is_a_recoverable_failure() {
    let docs = TestDocs::new()
        .with_bytes("huge.txt", &vec![b'a'; 2 * 1024 * 1024])
        .with_text("small.txt", "small");
    let registry = ExtractorRegistry::new().with(TextExtractor::new(&["*.txt".to_string()], 1).unwrap());

    let mut indexer =
        Indexer::with_extractors(docs.doc_dir(), docs.index_dir(), registry).unwrap();
    let stats = indexer.create_index().unwrap();

    assert_eq!(stats.failures, 1);
    assert_eq!(stats.documents_indexed, 1);
}

#[test]
fn test_word_only_registry_ignores_text() {
    let docs = TestDocs::recipes();
    let registry = ExtractorRegistry::new().with(WordExtractor::default());

    let mut indexer =
        Indexer::with_extractors(docs.doc_dir(), docs.index_dir(), registry).unwrap();
    let stats = indexer.create_index().unwrap();

    assert_eq!(stats.documents_indexed, 1);
    assert_eq!(stats.files_unsupported, 2);
    assert_eq!(
        indexed_paths(&docs.index_dir()),
        vec![docs.path("desserts/flan.doc")]
    );
}

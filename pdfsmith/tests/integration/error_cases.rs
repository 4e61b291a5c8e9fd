//! Integration tests for failure handling.

use pdfsmith::document::DocumentSession;
use pdfsmith::error::PdfSmithError;
use pdfsmith::merge::{MergeEngine, MergeQueue, SourceEntry};
use tempfile::TempDir;

use crate::common::{page_widths, write_bytes, write_pdf};

#[test]
fn test_missing_and_corrupt_sources_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.pdf");
    let corrupt = write_bytes(&temp_dir, "corrupt.png", b"\x89PNG garbage");
    let good = write_pdf(&temp_dir, "good.pdf", &[(150.0, 150.0)]);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([missing.clone(), corrupt.clone(), good]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.sources_merged, 1);
    let skipped: Vec<_> = report.skipped.iter().map(|s| s.path.clone()).collect();
    assert_eq!(skipped, vec![missing, corrupt]);
    assert!(report.skipped.iter().all(|s| !s.reason.is_empty()));
    assert_eq!(page_widths(&output), vec![150.0]);
}

#[test]
fn test_all_sources_unreadable_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let corrupt = write_bytes(&temp_dir, "corrupt.pdf", b"garbage");
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([corrupt]);

    let err = MergeEngine::new().run(&queue, &output).unwrap_err();

    assert!(matches!(err, PdfSmithError::MergeFailed { .. }));
    assert!(!output.exists());
}

#[test]
fn test_merge_into_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_pdf(&temp_dir, "good.pdf", &[(150.0, 150.0)]);
    let output = temp_dir.path().join("nowhere").join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([good]);

    let err = MergeEngine::new().run(&queue, &output).unwrap_err();

    assert!(matches!(err, PdfSmithError::Write { .. }));
    assert!(err.is_fatal());
    assert!(!output.exists());
}

#[test]
fn test_unsupported_kind_is_rejected() {
    let err = SourceEntry::new("notes.docx").unwrap_err();
    assert!(matches!(err, PdfSmithError::UnsupportedKind { .. }));

    let err = SourceEntry::new("no_extension").unwrap_err();
    assert!(matches!(err, PdfSmithError::UnsupportedKind { .. }));
}

#[test]
fn test_session_load_of_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let garbage = write_bytes(&temp_dir, "garbage.pdf", b"definitely not a pdf");

    let mut session = DocumentSession::new();
    let err = session.load(&garbage).unwrap_err();

    assert!(matches!(err, PdfSmithError::Load { .. }));
    assert!(!session.is_open());
}

#[test]
fn test_failed_load_keeps_open_document() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_pdf(&temp_dir, "good.pdf", &[(150.0, 150.0); 2]);
    let missing = temp_dir.path().join("missing.pdf");

    let mut session = DocumentSession::new();
    session.load(&good).unwrap();

    assert!(session.load(&missing).is_err());
    assert_eq!(session.path(), Some(good.as_path()));
    assert_eq!(session.page_count().unwrap(), 2);
}

#[test]
fn test_operations_without_document() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = DocumentSession::new();

    assert!(matches!(session.remove_page(0), Err(PdfSmithError::NoDocument)));
    assert!(matches!(
        session.save(temp_dir.path().join("out.pdf")),
        Err(PdfSmithError::NoDocument)
    ));
    assert!(matches!(session.page_count(), Err(PdfSmithError::NoDocument)));
}

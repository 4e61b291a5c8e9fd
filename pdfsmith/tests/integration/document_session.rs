//! Integration tests for editing a single document.

use pdfsmith::config::{CompressionLevel, SessionOptions, WriteOptions};
use pdfsmith::document::DocumentSession;
use pdfsmith::error::PdfSmithError;
use tempfile::TempDir;

use crate::common::{page_widths, write_pdf};

#[test]
fn test_remove_page_shifts_later_pages() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(
        &temp_dir,
        "four.pdf",
        &[(101.0, 500.0), (102.0, 500.0), (103.0, 500.0), (104.0, 500.0)],
    );
    let output = temp_dir.path().join("three.pdf");

    let mut session = DocumentSession::new();
    assert_eq!(session.load(&input).unwrap(), 4);

    session.remove_page(1).unwrap();

    assert_eq!(session.page_count().unwrap(), 3);
    let cached: Vec<f32> = session
        .pages()
        .unwrap()
        .iter()
        .map(|page| page.native_size.width)
        .collect();
    assert_eq!(cached, vec![101.0, 103.0, 104.0]);

    session.save(&output).unwrap();
    assert_eq!(page_widths(&output), vec![101.0, 103.0, 104.0]);
}

#[test]
fn test_remove_every_page_then_one_more() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(&temp_dir, "two.pdf", &[(100.0, 100.0), (200.0, 200.0)]);

    let mut session = DocumentSession::new();
    session.load(&input).unwrap();

    session.remove_page(0).unwrap();
    session.remove_page(0).unwrap();
    assert_eq!(session.page_count().unwrap(), 0);
    assert_eq!(session.current_index(), None);

    let err = session.remove_page(0).unwrap_err();
    assert!(matches!(err, PdfSmithError::Index { index: 0, len: 0 }));
}

#[test]
fn test_save_twice_requires_reload() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(&temp_dir, "one.pdf", &[(100.0, 100.0)]);
    let output = temp_dir.path().join("out.pdf");

    let mut session = DocumentSession::new();
    session.load(&input).unwrap();
    session.save(&output).unwrap();

    assert!(matches!(
        session.save(&output),
        Err(PdfSmithError::NoDocument)
    ));

    session.load(&output).unwrap();
    assert!(session.save(temp_dir.path().join("again.pdf")).is_ok());
}

#[test]
fn test_load_replaces_open_document() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_pdf(&temp_dir, "first.pdf", &[(100.0, 100.0); 3]);
    let second = write_pdf(&temp_dir, "second.pdf", &[(200.0, 200.0)]);

    let mut session = DocumentSession::new();
    session.load(&first).unwrap();
    session.remove_page(0).unwrap();
    session.load(&second).unwrap();

    assert_eq!(session.path(), Some(second.as_path()));
    assert_eq!(session.page_count().unwrap(), 1);
}

#[test]
fn test_save_over_source_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(&temp_dir, "doc.pdf", &[(100.0, 1.0), (200.0, 1.0)]);

    let options = SessionOptions {
        write: WriteOptions {
            compression: CompressionLevel::Maximum,
            ..WriteOptions::default()
        },
        ..SessionOptions::default()
    };
    let mut session = DocumentSession::with_options(options);
    session.load(&input).unwrap();
    session.remove_page(1).unwrap();
    session.save(&input).unwrap();

    assert_eq!(page_widths(&input), vec![100.0]);
    assert!(!temp_dir.path().join("doc.pdf.tmp").exists());
}

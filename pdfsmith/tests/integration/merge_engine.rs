//! Integration tests for merging PDF and image sources.

use pdfsmith::config::{CompressionLevel, MergeOptions, WriteOptions};
use pdfsmith::error::PdfSmithError;
use pdfsmith::merge::{MergeEngine, MergeQueue, PageGeometry, SourceKind};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{
    WHITE, first_embedded_image, is_red, page_sizes, page_widths, write_bytes, write_image,
    write_pdf,
};

#[test]
fn test_image_follows_first_pdf_geometry() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "doc.pdf", &[(200.0, 300.0)]);
    let image = write_image(&temp_dir, "wide.png", 400, 100);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([pdf, image]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();

    assert_eq!(report.reference_geometry, PageGeometry::new(200.0, 300.0));
    assert_eq!(page_sizes(&output), vec![(200.0, 300.0), (200.0, 300.0)]);

    // 200x50 image centered vertically: rows 125..175
    let page = first_embedded_image(&output);
    assert_eq!(page.dimensions(), (200, 300));
    assert_eq!(*page.get_pixel(100, 124), WHITE);
    assert!(is_red(page.get_pixel(100, 125)));
    assert!(is_red(page.get_pixel(0, 150)));
    assert!(is_red(page.get_pixel(199, 150)));
    assert!(is_red(page.get_pixel(100, 174)));
    assert_eq!(*page.get_pixel(100, 175), WHITE);
}

#[test]
fn test_lone_image_uses_letter() {
    let temp_dir = TempDir::new().unwrap();
    let image = write_image(&temp_dir, "square.png", 100, 100);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([image]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();

    assert_eq!(report.total_pages, 1);
    assert_eq!(page_sizes(&output), vec![(612.0, 792.0)]);

    // 612x612 image at y-offset 90
    let page = first_embedded_image(&output);
    assert_eq!(page.dimensions(), (612, 792));
    assert_eq!(*page.get_pixel(306, 89), WHITE);
    assert!(is_red(page.get_pixel(306, 90)));
    assert!(is_red(page.get_pixel(306, 701)));
    assert_eq!(*page.get_pixel(306, 702), WHITE);
}

#[test]
fn test_empty_queue_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.pdf");

    let err = MergeEngine::new()
        .run(&MergeQueue::new(), &output)
        .unwrap_err();

    assert!(matches!(err, PdfSmithError::EmptyQueue));
    assert!(!output.exists());
}

#[test]
fn test_single_pdf_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(
        &temp_dir,
        "doc.pdf",
        &[(101.0, 500.0), (102.0, 500.0), (103.0, 500.0)],
    );
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([pdf]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();

    assert_eq!(report.total_pages, 3);
    assert_eq!(page_widths(&output), vec![101.0, 102.0, 103.0]);
}

#[test]
fn test_output_order_matches_queue_order() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_pdf(&temp_dir, "first.pdf", &[(101.0, 500.0), (102.0, 500.0)]);
    let image = write_image(&temp_dir, "middle.jpg", 10, 10);
    let last = write_pdf(&temp_dir, "last.pdf", &[(301.0, 500.0)]);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([first, image, last]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();

    assert_eq!(report.sources_merged, 3);
    assert_eq!(page_widths(&output), vec![101.0, 102.0, 101.0, 301.0]);
}

#[test]
fn test_failed_reference_supplier_falls_back_to_letter() {
    let temp_dir = TempDir::new().unwrap();
    let broken = write_bytes(&temp_dir, "broken.pdf", b"%PDF-1.5 truncated");
    let pdf = write_pdf(&temp_dir, "doc.pdf", &[(400.0, 500.0)]);
    let image = write_image(&temp_dir, "scan.png", 50, 50);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([broken.clone(), pdf, image]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();

    assert_eq!(report.reference_geometry, PageGeometry::LETTER);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, broken);
    assert_eq!(report.skipped[0].kind, SourceKind::Pdf);
    assert_eq!(page_sizes(&output), vec![(400.0, 500.0), (612.0, 792.0)]);
}

#[test]
fn test_oversized_media_box_does_not_size_images() {
    let temp_dir = TempDir::new().unwrap();
    let huge = write_pdf(&temp_dir, "huge.pdf", &[(100_000.0, 100_000.0)]);
    let image = write_image(&temp_dir, "scan.png", 10, 10);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([huge, image]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();

    assert_eq!(report.reference_geometry, PageGeometry::LETTER);
    assert!(report.is_complete());
    assert_eq!(page_sizes(&output)[1], (612.0, 792.0));
}

#[test]
fn test_queue_is_not_modified() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "doc.pdf", &[(200.0, 300.0)]);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([pdf]);
    let before = queue.to_ordered_list();

    MergeEngine::new().run(&queue, &output).unwrap();

    assert_eq!(queue.to_ordered_list(), before);
}

#[rstest]
#[case::none(CompressionLevel::None)]
#[case::standard(CompressionLevel::Standard)]
#[case::maximum(CompressionLevel::Maximum)]
fn test_compression_levels(#[case] compression: CompressionLevel) {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "doc.pdf", &[(200.0, 300.0); 2]);
    let image = write_image(&temp_dir, "scan.jpeg", 20, 40);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([pdf, image]);

    let options = MergeOptions {
        write: WriteOptions {
            compression,
            ..WriteOptions::default()
        },
        ..MergeOptions::default()
    };
    let report = MergeEngine::with_options(options)
        .run(&queue, &output)
        .unwrap();

    assert_eq!(report.write.compression, compression);
    assert_eq!(page_sizes(&output).len(), 3);
}

#[test]
fn test_report_serializes_to_json() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "doc.pdf", &[(200.0, 300.0)]);
    let missing = temp_dir.path().join("missing.png");
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([pdf, missing]);

    let report = MergeEngine::new().run(&queue, &output).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["sourcesMerged"], 1);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["referenceGeometry"]["width"], 200.0);
    assert_eq!(json["skipped"][0]["kind"], "image");
}

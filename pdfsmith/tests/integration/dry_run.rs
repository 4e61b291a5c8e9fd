//! Integration tests for inspecting a queue without merging it.

use pdfsmith::merge::{MergeEngine, MergeQueue, PageGeometry};
use tempfile::TempDir;

use crate::common::{write_bytes, write_image, write_pdf};

#[test]
fn test_plan_counts_pages_and_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "doc.pdf", &[(200.0, 300.0), (210.0, 300.0)]);
    let image = write_image(&temp_dir, "scan.png", 40, 20);
    let broken = write_bytes(&temp_dir, "broken.pdf", b"not a pdf");

    let mut queue = MergeQueue::new();
    queue.add([pdf, image, broken]);

    let plan = MergeEngine::new().plan(&queue).unwrap();

    assert_eq!(plan.total_pages, 3);
    assert_eq!(plan.readable_count(), 2);
    assert_eq!(plan.skipped_count(), 1);
    assert_eq!(plan.reference_geometry, PageGeometry::new(200.0, 300.0));

    assert_eq!(plan.sources[0].pages, Some(2));
    assert_eq!(
        plan.sources[1].first_page_size,
        Some(PageGeometry::new(40.0, 20.0))
    );
    assert!(plan.sources[2].error.is_some());

    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 3);
}

#[test]
fn test_plan_matches_merge_outcome() {
    let temp_dir = TempDir::new().unwrap();
    let image = write_image(&temp_dir, "scan.png", 40, 20);
    let pdf = write_pdf(&temp_dir, "doc.pdf", &[(200.0, 300.0)]);
    let output = temp_dir.path().join("out.pdf");

    let mut queue = MergeQueue::new();
    queue.add([image, pdf]);

    let engine = MergeEngine::new();
    let plan = engine.plan(&queue).unwrap();
    let report = engine.run(&queue, &output).unwrap();

    assert_eq!(plan.total_pages, report.total_pages);
    assert_eq!(plan.reference_geometry, report.reference_geometry);
    assert_eq!(plan.skipped_count(), report.skipped.len());
}

#[test]
fn test_plan_with_nothing_readable() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.pdf");

    let mut queue = MergeQueue::new();
    queue.add([missing]);

    let plan = MergeEngine::new().plan(&queue).unwrap();

    assert_eq!(plan.total_pages, 0);
    assert_eq!(plan.readable_count(), 0);
    assert_eq!(plan.reference_geometry, PageGeometry::LETTER);
}

//! Output formatting and display for pdfsmith.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Error and warning display
//! - Merge plans and reports
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfsmith::output::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, true);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::merge::{MergePlan, MergeReport, PageGeometry};

/// Display a merge report to the user.
///
/// Skipped sources are shown as warnings, even in quiet mode.
pub fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    for skipped in &report.skipped {
        formatter.warning(&format!(
            "Skipped {} ({}): {}",
            skipped.path.display(),
            skipped.kind,
            skipped.reason
        ));
    }

    formatter.success(&format!(
        "Merged {} source(s) into {} page(s): {}",
        report.sources_merged,
        report.total_pages,
        report.output_path.display()
    ));
    formatter.detail("Page size", &format_geometry(report.reference_geometry));
    formatter.detail("Output size", &report.write.format_file_size());
    formatter.detail(
        "Time",
        &format!("{:.2}s", report.elapsed.as_secs_f64()),
    );
}

/// Display a dry-run merge plan to the user.
pub fn display_merge_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section("Merge plan:");

    for (position, source) in plan.sources.iter().enumerate() {
        let line = match (&source.error, source.pages) {
            (Some(error), _) => format!(
                "{} ({}) - will be skipped: {}",
                source.path.display(),
                source.kind,
                error
            ),
            (None, Some(pages)) => format!(
                "{} ({}) - {} page(s)",
                source.path.display(),
                source.kind,
                pages
            ),
            (None, None) => format!("{} ({})", source.path.display(), source.kind),
        };
        formatter.list_item(position + 1, &line);
    }

    formatter.blank_line();
    if plan.readable_count() == 0 {
        formatter.warning("No source is readable; nothing would be written");
    } else {
        formatter.info(&format!(
            "Would write {} page(s) from {} source(s); images sized to {}",
            plan.total_pages,
            plan.readable_count(),
            format_geometry(plan.reference_geometry)
        ));
    }
}

/// Display the page sizes of a document.
pub fn display_page_sizes(formatter: &OutputFormatter, sizes: &[PageGeometry]) {
    for (index, size) in sizes.iter().enumerate() {
        formatter.list_item(index + 1, &format_geometry(*size));
    }
}

/// Format a page size as `W x H pt`.
pub fn format_geometry(geometry: PageGeometry) -> String {
    format!("{} x {} pt", geometry.width, geometry.height)
}

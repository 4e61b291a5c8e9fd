//! Utilities for input path expansion and size formatting.

use crate::{Result, error::PdfSmithError};
use std::path::PathBuf;

/// Expand input patterns into filesystem paths, preserving pattern order.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// A pattern that matches nothing is kept as a literal path so the caller
/// can report it (a missing file, a typo) instead of silently dropping it.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from the glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = collect_paths_for_pattern(pattern)?;

        if paths.is_empty() {
            resolved_paths.push(PathBuf::from(pattern));
        } else {
            resolved_paths.extend(paths);
        }
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths, sorted by name.
///
/// Pattern examples:
/// - `"scans/*.png"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| PdfSmithError::Other {
        message: format!("Invalid input pattern '{pattern}': {err}"),
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| PdfSmithError::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    resolved_paths.sort();
    Ok(resolved_paths)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

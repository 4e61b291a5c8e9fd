//! Configuration for sessions, merges, and page selection.
//!
//! Options here are plain values with defaults; the CLI builds them from
//! arguments and hands them to [`DocumentSession`](crate::document::DocumentSession)
//! and [`MergeEngine`](crate::merge::MergeEngine).

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::PdfSmithError;
use crate::merge::PageGeometry;

/// Compression level for written PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Write streams as they are.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress and drop unreachable objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfSmithError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfSmithError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Options controlling how documents are written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write to a temporary sibling file and rename it into place.
    pub atomic: bool,

    /// Compression applied before writing.
    pub compression: CompressionLevel,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compression: CompressionLevel::Standard,
        }
    }
}

/// Options for a merge run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Page size used for images when no PDF has supplied one yet.
    pub default_page_size: PageGeometry,

    /// How the merged output is written.
    pub write: WriteOptions,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            default_page_size: PageGeometry::LETTER,
            write: WriteOptions::default(),
        }
    }
}

/// Options for a document editing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Scale from native points to preview pixels.
    ///
    /// The default of one third turns a Letter page into a 204x264 preview.
    pub preview_scale: f32,

    /// How the edited document is written on save.
    pub write: WriteOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            preview_scale: 1.0 / 3.0,
            write: WriteOptions::default(),
        }
    }
}

/// Page selection by 1-indexed page numbers.
///
/// Supports individual pages and ranges:
/// - "1" - single page
/// - "1-5" - range of pages (inclusive)
/// - "1,3,5" - multiple individual pages
/// - "1-5,10-15" - combination of ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    ranges: Vec<PageRangeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageRangeItem {
    Single(u32),
    Range(u32, u32),
}

impl PageRange {
    /// Parse a page range string such as `"1-5,10,15-20"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfsmith::config::PageRange;
    ///
    /// let range = PageRange::parse("1-3,7").unwrap();
    /// assert!(range.contains(2));
    /// assert!(!range.contains(5));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let mut ranges = Vec::new();

        for part in s.split(',').map(str::trim) {
            if let Some((start, end)) = part.split_once('-') {
                if end.contains('-') {
                    bail!("Invalid page range format: {part}. Expected format like '1-5'");
                }

                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;

                if start > end {
                    bail!("Invalid range {start}-{end}: start page must not exceed end page");
                }

                ranges.push(PageRangeItem::Range(start, end));
            } else {
                ranges.push(PageRangeItem::Single(parse_page_number(part)?));
            }
        }

        Ok(Self { ranges })
    }

    /// Check if a 1-indexed page number is included in this range.
    pub fn contains(&self, page: u32) -> bool {
        self.ranges.iter().any(|item| match item {
            PageRangeItem::Single(p) => *p == page,
            PageRangeItem::Range(start, end) => (*start..=*end).contains(&page),
        })
    }

    /// Resolve the selection against a document of `page_count` pages.
    ///
    /// Returns sorted, de-duplicated 0-based page indices. Every page named
    /// by the range must exist.
    pub fn to_indices(&self, page_count: usize) -> crate::Result<Vec<usize>> {
        let highest = self
            .ranges
            .iter()
            .map(|item| match item {
                PageRangeItem::Single(p) => *p,
                PageRangeItem::Range(_, end) => *end,
            })
            .max()
            .map_or(0, |page| page as usize);

        if highest > page_count {
            return Err(PdfSmithError::index(highest - 1, page_count));
        }

        let pages: BTreeSet<usize> = self
            .ranges
            .iter()
            .flat_map(|item| match *item {
                PageRangeItem::Single(p) => p..=p,
                PageRangeItem::Range(start, end) => start..=end,
            })
            .map(|page| page as usize - 1)
            .collect();

        Ok(pages.into_iter().collect())
    }
}

fn parse_page_number(s: &str) -> Result<u32> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Page range cannot contain empty entries");
    }

    let page: u32 = s
        .parse()
        .with_context(|| format!("Invalid page number: {s}"))?;

    if page == 0 {
        bail!("Page numbers must be positive (1-indexed)");
    }

    Ok(page)
}

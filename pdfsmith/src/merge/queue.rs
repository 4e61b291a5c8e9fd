//! Ordered merge sources.
//!
//! The queue is insertion-ordered and insertion order is merge order. The
//! [`MergeEngine`](crate::merge::MergeEngine) only ever reads a snapshot of
//! it; clearing after a successful merge is the caller's job.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PdfSmithError, Result};

/// Kind of a merge source, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A PDF document; every page is appended.
    Pdf,
    /// A JPEG or PNG image; becomes one page.
    Image,
}

impl SourceKind {
    /// Classify `path` by its extension, case-insensitively.
    ///
    /// `pdf` is a document; `jpg`, `jpeg` and `png` are images. Anything
    /// else, including a missing extension, is unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" | "png" => Some(Self::Image),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// One queued merge source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    /// Path to the source file.
    pub path: PathBuf,
    /// How the source is merged.
    pub kind: SourceKind,
}

impl SourceEntry {
    /// Classify `path` into an entry.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::UnsupportedKind`] for unrecognized extensions.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match SourceKind::from_path(&path) {
            Some(kind) => Ok(Self { path, kind }),
            None => Err(PdfSmithError::unsupported_kind(path)),
        }
    }
}

/// Insertion-ordered list of merge sources.
#[derive(Debug, Clone, Default)]
pub struct MergeQueue {
    entries: Vec<SourceEntry>,
}

impl MergeQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of paths.
    ///
    /// Each path is classified on its own. Unsupported paths are rejected
    /// individually and returned; every other path is appended, keeping the
    /// batch's relative order.
    pub fn add<I, P>(&mut self, paths: I) -> Vec<PdfSmithError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut rejected = Vec::new();

        for path in paths {
            match SourceEntry::new(path) {
                Ok(entry) => {
                    debug!(path = %entry.path.display(), kind = %entry.kind, "queued source");
                    self.entries.push(entry);
                }
                Err(err) => rejected.push(err),
            }
        }

        rejected
    }

    /// Remove the entries at `indices`.
    ///
    /// Indices refer to the queue as it was before the call; duplicates are
    /// ignored. Either every index is valid and all are removed, or nothing
    /// is removed.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::Index`] for the first out-of-range index.
    pub fn remove_at(&mut self, indices: &[usize]) -> Result<()> {
        let len = self.entries.len();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(PdfSmithError::index(index, len));
        }

        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        for index in unique.into_iter().rev() {
            self.entries.remove(index);
        }

        Ok(())
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Borrow the entries in merge order.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Owned snapshot of the entries in merge order.
    pub fn to_ordered_list(&self) -> Vec<SourceEntry> {
        self.entries.clone()
    }

    /// Number of queued sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

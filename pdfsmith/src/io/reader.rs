//! PDF loading.
//!
//! [`PdfReader`] turns a path into a [`PdfDocument`], classifying failures
//! into missing files, encrypted documents, and unparseable content.

use lopdf::Document;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::error::{PdfSmithError, Result};
use crate::pdf::PdfDocument;

/// PDF reader with configurable verification.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Reject documents without pages.
    require_pages: bool,
}

impl PdfReader {
    /// Create a reader that rejects documents without pages.
    pub fn new() -> Self {
        Self {
            require_pages: true,
        }
    }

    /// Create a reader that accepts documents without pages.
    pub fn allow_empty() -> Self {
        Self {
            require_pages: false,
        }
    }

    /// Load a PDF document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist or is a directory
    /// - The file is not a valid PDF
    /// - The PDF is encrypted
    /// - The PDF has no pages and this reader requires them
    pub fn read(&self, path: &Path) -> Result<PdfDocument> {
        Self::check_path_exists(path)?;

        let start = Instant::now();
        let document = Document::load(path).map_err(|err| {
            let reason = err.to_string();
            if reason.contains("encrypt") || reason.contains("password") {
                PdfSmithError::encrypted_pdf(path.to_path_buf())
            } else {
                PdfSmithError::load(path, reason)
            }
        })?;

        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(PdfSmithError::encrypted_pdf(path.to_path_buf()));
        }

        let document = PdfDocument::from_document(document)
            .map_err(|err| PdfSmithError::load(path, err.to_string()))?;

        if self.require_pages && document.page_count() == 0 {
            return Err(PdfSmithError::load(path, "PDF has no pages"));
        }

        debug!(
            path = %path.display(),
            pages = document.page_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded pdf"
        );

        Ok(document)
    }

    /// Check that `path` names an existing regular file.
    pub fn check_path_exists(path: &Path) -> Result<()> {
        if !path.try_exists()? {
            return Err(PdfSmithError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(PdfSmithError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

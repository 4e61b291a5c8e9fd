//! Single-document editing.
//!
//! A [`DocumentSession`] owns at most one open PDF together with a
//! [`PageStore`] of its page previews. Every mutation goes through the
//! session, which keeps the document and the store the same length after
//! each call. A session moves through open, any number of page removals,
//! and finally save or close; saving closes it.

pub mod page_store;
pub mod rasterizer;

pub use page_store::{Page, PageStore};
pub use rasterizer::{BlankRasterizer, Rasterizer};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::SessionOptions;
use crate::error::{PdfSmithError, Result};
use crate::io::{PdfReader, WriteStatistics};
use crate::merge::PageGeometry;
use crate::pdf::PdfDocument;

#[derive(Debug)]
struct OpenDocument {
    path: PathBuf,
    document: PdfDocument,
    pages: PageStore,
    current: Option<usize>,
}

impl OpenDocument {
    fn ensure_in_sync(&self) -> Result<()> {
        let native = self.document.page_count();
        let cached = self.pages.count();
        if native != cached {
            return Err(PdfSmithError::other(format!(
                "Page cache out of sync: document has {native} pages, cache has {cached}"
            )));
        }
        Ok(())
    }
}

/// Editing session for one document at a time.
pub struct DocumentSession {
    options: SessionOptions,
    rasterizer: Box<dyn Rasterizer>,
    open: Option<OpenDocument>,
}

impl DocumentSession {
    /// Create a session with default options and blank previews.
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    /// Create a session with custom options and blank previews.
    pub fn with_options(options: SessionOptions) -> Self {
        let rasterizer = BlankRasterizer::new(options.preview_scale);
        Self::with_rasterizer(options, rasterizer)
    }

    /// Create a session that renders previews with `rasterizer`.
    pub fn with_rasterizer(
        options: SessionOptions,
        rasterizer: impl Rasterizer + 'static,
    ) -> Self {
        Self {
            options,
            rasterizer: Box::new(rasterizer),
            open: None,
        }
    }

    /// Open the PDF at `path` and render every page.
    ///
    /// On success any previously open document is closed and replaced. On
    /// failure the session is left exactly as it was.
    ///
    /// Returns the number of pages loaded.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::Load`] if the file cannot be opened as a PDF
    /// or a page cannot be rendered.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let as_load_error = |err: PdfSmithError| match err {
            err @ PdfSmithError::Load { .. } => err,
            other => PdfSmithError::load(path, other.to_string()),
        };

        let document = PdfReader::allow_empty().read(path).map_err(as_load_error)?;

        let mut pages = Vec::with_capacity(document.page_count());
        for index in 0..document.page_count() {
            let native_size = document
                .page_native_size(index)
                .ok()
                .filter(PageGeometry::is_valid)
                .unwrap_or(PageGeometry::LETTER);
            let raster = self
                .rasterizer
                .rasterize(&document, index)
                .map_err(as_load_error)?;
            debug!(
                page = index + 1,
                width = raster.width(),
                height = raster.height(),
                "rendered preview"
            );
            pages.push(Page {
                raster,
                native_size,
            });
        }

        let page_count = pages.len();
        let mut store = PageStore::new();
        store.replace_all(pages);

        let open = OpenDocument {
            path: path.to_path_buf(),
            document,
            pages: store,
            current: (page_count > 0).then_some(0),
        };
        open.ensure_in_sync()?;

        if let Some(previous) = self.open.replace(open) {
            debug!(path = %previous.path.display(), "closed previous document");
        }
        info!(path = %path.display(), pages = page_count, "document loaded");

        Ok(page_count)
    }

    /// Delete the page at `index` from the document and the preview cache.
    ///
    /// Later pages move down by one. The current page is clamped to the new
    /// last page, or cleared when no pages remain.
    ///
    /// # Errors
    ///
    /// - [`PdfSmithError::NoDocument`] if nothing is open
    /// - [`PdfSmithError::Index`] if `index` is out of range
    pub fn remove_page(&mut self, index: usize) -> Result<()> {
        let open = self.open.as_mut().ok_or(PdfSmithError::NoDocument)?;

        let count = open.pages.count();
        if index >= count {
            return Err(PdfSmithError::index(index, count));
        }

        open.document.delete_page(index)?;
        open.pages.delete_at(index)?;

        let remaining = count - 1;
        open.current = match remaining {
            0 => None,
            _ => open.current.map(|current| current.min(remaining - 1)),
        };
        open.ensure_in_sync()?;

        debug!(page = index + 1, remaining, "removed page");
        Ok(())
    }

    /// Write the document to `destination` and close the session.
    ///
    /// If the write fails the document stays open.
    ///
    /// # Errors
    ///
    /// - [`PdfSmithError::NoDocument`] if nothing is open
    /// - [`PdfSmithError::Write`] if the file cannot be written
    pub fn save(&mut self, destination: impl AsRef<Path>) -> Result<WriteStatistics> {
        let destination = destination.as_ref();
        let open = self.open.as_mut().ok_or(PdfSmithError::NoDocument)?;

        open.document.prune_unreachable();
        let statistics = open
            .document
            .save(destination, self.options.write)
            .map_err(|err| match err {
                err @ PdfSmithError::Write { .. } => err,
                other => PdfSmithError::write(destination, other),
            })?;

        info!(
            source = %open.path.display(),
            output = %destination.display(),
            size = statistics.file_size,
            "document saved"
        );
        self.open = None;

        Ok(statistics)
    }

    /// Close the open document without saving.
    ///
    /// Returns whether a document was open.
    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }

    /// Whether a document is open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Path of the open document.
    pub fn path(&self) -> Option<&Path> {
        self.open.as_ref().map(|open| open.path.as_path())
    }

    /// Number of pages in the open document.
    pub fn page_count(&self) -> Result<usize> {
        Ok(self.opened()?.pages.count())
    }

    /// Borrow the cached page at `index`.
    pub fn page(&self, index: usize) -> Result<&Page> {
        self.opened()?.pages.get(index)
    }

    /// Borrow every cached page.
    pub fn pages(&self) -> Result<&PageStore> {
        Ok(&self.opened()?.pages)
    }

    /// Index of the page being viewed, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.open.as_ref().and_then(|open| open.current)
    }

    /// View the page at `index`.
    pub fn go_to(&mut self, index: usize) -> Result<()> {
        let open = self.open.as_mut().ok_or(PdfSmithError::NoDocument)?;
        open.pages.get(index)?;
        open.current = Some(index);
        Ok(())
    }

    /// Advance to the next page, stopping at the last one.
    pub fn next(&mut self) -> Option<usize> {
        let open = self.open.as_mut()?;
        let last = open.pages.count().checked_sub(1)?;
        open.current = open.current.map(|current| (current + 1).min(last));
        open.current
    }

    /// Go back to the previous page, stopping at the first one.
    pub fn previous(&mut self) -> Option<usize> {
        let open = self.open.as_mut()?;
        open.current = open.current.map(|current| current.saturating_sub(1));
        open.current
    }

    fn opened(&self) -> Result<&OpenDocument> {
        self.open.as_ref().ok_or(PdfSmithError::NoDocument)
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

//! Cached page previews for an open document.

use image::RgbaImage;

use crate::error::{PdfSmithError, Result};
use crate::merge::PageGeometry;

/// One cached page. Its index is its position in the [`PageStore`].
#[derive(Debug, Clone)]
pub struct Page {
    /// Rendered preview.
    pub raster: RgbaImage,
    /// Size of the page in points.
    pub native_size: PageGeometry,
}

/// Ordered page previews. Positions are always contiguous from 0.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
}

impl PageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents.
    pub fn replace_all(&mut self, pages: Vec<Page>) {
        self.pages = pages;
    }

    /// Remove and return the page at `index`. Later pages move down by one.
    pub fn delete_at(&mut self, index: usize) -> Result<Page> {
        if index >= self.pages.len() {
            return Err(PdfSmithError::index(index, self.pages.len()));
        }
        Ok(self.pages.remove(index))
    }

    /// Borrow the page at `index`.
    pub fn get(&self, index: usize) -> Result<&Page> {
        self.pages
            .get(index)
            .ok_or_else(|| PdfSmithError::index(index, self.pages.len()))
    }

    /// Number of cached pages.
    pub fn count(&self) -> usize {
        self.pages.len()
    }

    /// Pages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

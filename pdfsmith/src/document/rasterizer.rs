//! Page preview rendering.

use image::{Rgba, RgbaImage};

use crate::error::{PdfSmithError, Result};
use crate::merge::PageGeometry;
use crate::pdf::PdfDocument;

/// Produces a raster preview of one page of a document.
///
/// Implementations must be shareable across threads so a session can be
/// moved onto a worker.
pub trait Rasterizer: Send + Sync {
    /// Render the page at `page_index`.
    fn rasterize(&self, document: &PdfDocument, page_index: usize) -> Result<RgbaImage>;
}

/// Renders every page as a blank white sheet with a light grey outline,
/// sized from the page's media box.
///
/// Content is not drawn.
#[derive(Debug, Clone, Copy)]
pub struct BlankRasterizer {
    scale: f32,
}

impl BlankRasterizer {
    const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const OUTLINE: Rgba<u8> = Rgba([220, 220, 220, 255]);

    /// Create a rasterizer producing `scale` pixels per point.
    ///
    /// Non-positive or non-finite scales fall back to 1.
    pub fn new(scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self { scale }
    }

    /// Pixels per point.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Preview pixels for a page, each side within `1..=MAX_DIMENSION`.
    fn preview_size(&self, size: PageGeometry) -> (u32, u32) {
        let side = |points: f32| {
            (points * self.scale)
                .round()
                .clamp(1.0, PageGeometry::MAX_DIMENSION) as u32
        };
        (side(size.width), side(size.height))
    }
}

impl Default for BlankRasterizer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Rasterizer for BlankRasterizer {
    fn rasterize(&self, document: &PdfDocument, page_index: usize) -> Result<RgbaImage> {
        let size = match document.page_native_size(page_index) {
            Ok(size) if size.is_valid() => size,
            Err(err @ PdfSmithError::Index { .. }) => return Err(err),
            _ => PageGeometry::LETTER,
        };

        let (width, height) = self.preview_size(size);
        let mut image = RgbaImage::from_pixel(width, height, Self::BACKGROUND);

        if width >= 4 && height >= 4 {
            for x in 0..width {
                image.put_pixel(x, 0, Self::OUTLINE);
                image.put_pixel(x, height - 1, Self::OUTLINE);
            }
            for y in 0..height {
                image.put_pixel(0, y, Self::OUTLINE);
                image.put_pixel(width - 1, y, Self::OUTLINE);
            }
        }

        Ok(image)
    }
}

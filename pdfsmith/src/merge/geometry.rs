//! Page geometry and image placement.
//!
//! Images are normalized onto pages of the merge's reference size. The fit
//! rule compares aspect ratios and pins the image to one full edge of the
//! page: an image relatively wider than the page spans the page width, any
//! other image spans the page height. The other dimension is derived from
//! the image's aspect ratio and truncated to whole pixels, so the image may
//! fall a pixel short of the second edge even when the aspect ratios are
//! nearly equal.

use serde::Serialize;

/// Width and height of a page in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl PageGeometry {
    /// US Letter, 8.5 x 11 inches.
    pub const LETTER: Self = Self::new(612.0, 792.0);

    /// Largest page side accepted, in points. This is the user space limit
    /// of PDF 1.6 and later (200 inches).
    pub const MAX_DIMENSION: f32 = 14_400.0;

    /// Create a geometry from width and height in points.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Whole-pixel canvas size used when composing an image page at one
    /// pixel per point. Fractional points are truncated and each side is
    /// kept within `1..=MAX_DIMENSION`.
    pub fn canvas_size(&self) -> (u32, u32) {
        (canvas_side(self.width), canvas_side(self.height))
    }

    /// Whether both dimensions are finite, positive, and no larger than
    /// [`MAX_DIMENSION`](Self::MAX_DIMENSION).
    pub fn is_valid(&self) -> bool {
        let side = |value: f32| value.is_finite() && value > 0.0 && value <= Self::MAX_DIMENSION;
        side(self.width) && side(self.height)
    }
}

fn canvas_side(points: f32) -> u32 {
    (points as u32).clamp(1, PageGeometry::MAX_DIMENSION as u32)
}

/// Where a scaled image lands on a composed page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Scaled image width.
    pub width: u32,
    /// Scaled image height.
    pub height: u32,
    /// Left offset on the page canvas.
    pub x: u32,
    /// Top offset on the page canvas.
    pub y: u32,
}

/// Scale an `image_width` x `image_height` image onto a page of `reference`
/// size and center it.
pub fn fit_image(image_width: u32, image_height: u32, reference: PageGeometry) -> Placement {
    let (canvas_width, canvas_height) = reference.canvas_size();
    let ref_width = reference.width as f64;
    let ref_height = reference.height as f64;
    let image_aspect = image_width as f64 / image_height.max(1) as f64;

    let (width, height) = if image_aspect > reference.aspect_ratio() {
        (ref_width as u32, (ref_width / image_aspect) as u32)
    } else {
        ((ref_height * image_aspect) as u32, ref_height as u32)
    };

    let width = width.clamp(1, canvas_width);
    let height = height.clamp(1, canvas_height);

    Placement {
        width,
        height,
        x: (canvas_width - width) / 2,
        y: (canvas_height - height) / 2,
    }
}

//! Raster image codec.
//!
//! Decodes JPEG and PNG sources, composes them onto a white page of the
//! merge's reference size, and encodes the composed page as a single-page
//! PDF. Composed pages are laid out at one pixel per point.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::Path;

use crate::error::{PdfSmithError, Result};
use crate::merge::geometry::{PageGeometry, Placement, fit_image};

/// Resource name of the page image inside composed pages.
const IMAGE_RESOURCE: &str = "Im0";

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Decode an image file into RGB pixels. Alpha is discarded.
pub fn decode(path: &Path) -> Result<RgbImage> {
    let image = image::open(path)?.to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(PdfSmithError::other(format!(
            "Image has no pixels: {}",
            path.display()
        )));
    }

    Ok(image)
}

/// Scale `image` onto a white page of `reference` size, centered.
///
/// Returns the composed page and where the image was placed on it.
///
/// # Errors
///
/// Fails without allocating if `reference` is not a valid page size.
pub fn compose_page(image: &RgbImage, reference: PageGeometry) -> Result<(RgbImage, Placement)> {
    if !reference.is_valid() {
        return Err(PdfSmithError::other(format!(
            "Page size {} x {} is outside the supported range",
            reference.width, reference.height
        )));
    }

    let placement = fit_image(image.width(), image.height(), reference);
    let scaled = imageops::resize(image, placement.width, placement.height, FilterType::Lanczos3);

    let (width, height) = reference.canvas_size();
    let mut page = RgbImage::from_pixel(width, height, WHITE);
    imageops::replace(
        &mut page,
        &scaled,
        i64::from(placement.x),
        i64::from(placement.y),
    );

    Ok((page, placement))
}

/// Encode `page` as a one-page PDF whose media box matches its pixel size.
pub fn encode_single_page_pdf(page: &RgbImage) -> Result<Vec<u8>> {
    let width = i64::from(page.width());
    let height = i64::from(page.height());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        page.as_raw().clone(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_RESOURCE => image_id,
            },
        },
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

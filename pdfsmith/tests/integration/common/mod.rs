//! Shared helpers for integration tests.
//!
//! Fixtures are generated on the fly: PDFs with lopdf, images with the
//! `image` crate. Every helper writes into a caller-owned temp directory.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use lopdf::{Document, Object, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const RED: Rgb<u8> = Rgb([200, 30, 30]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Write a PDF with one blank page per entry of `sizes`.
pub fn write_pdf(dir: &TempDir, name: &str, sizes: &[(f32, f32)]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = sizes
        .iter()
        .map(|&(width, height)| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.path().join(name);
    doc.save(&path).expect("Failed to write PDF fixture");
    path
}

/// Write a solid-colour image; the format follows the file extension.
pub fn write_image(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join(name);
    RgbImage::from_pixel(width, height, RED)
        .save(&path)
        .expect("Failed to write image fixture");
    path
}

/// Write arbitrary bytes, e.g. a corrupt source.
pub fn write_bytes(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Page widths of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<f32> {
    page_sizes(path).into_iter().map(|(width, _)| width).collect()
}

/// Page sizes of the PDF at `path`, in page order.
pub fn page_sizes(path: &Path) -> Vec<(f32, f32)> {
    let doc = pdfsmith::pdf::PdfDocument::open(path).expect("Failed to open output");
    doc.page_sizes()
        .expect("Failed to read page sizes")
        .into_iter()
        .map(|size| (size.width, size.height))
        .collect()
}

/// Decode the first image XObject found in the PDF at `path`.
pub fn first_embedded_image(path: &Path) -> RgbImage {
    let doc = Document::load(path).expect("Failed to load output");

    doc.objects
        .values()
        .find_map(|object| {
            let stream = object.as_stream().ok()?;
            let subtype = stream.dict.get(b"Subtype").ok()?.as_name().ok()?;
            if subtype != b"Image" {
                return None;
            }

            let width = stream.dict.get(b"Width").ok()?.as_i64().ok()? as u32;
            let height = stream.dict.get(b"Height").ok()?.as_i64().ok()? as u32;
            let pixels = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            RgbImage::from_raw(width, height, pixels)
        })
        .expect("No image XObject in output")
}

/// Whether `pixel` is close to the fixture colour.
pub fn is_red(pixel: &Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0;
    r > 150 && g < 90 && b < 90
}

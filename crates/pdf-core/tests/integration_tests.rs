//! Integration tests for pdf-core
//!
//! These tests write real files and read them back with lopdf.

use image::{Rgb, RgbImage};
use lopdf::Document;
use pdf_core::{emit, PageSize, PageSizing, PdfDocument, PdfError};
use std::path::PathBuf;

/// Fresh scratch directory for one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pdf-core-it-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

fn media_box(doc: &Document) -> Vec<f32> {
    let page_id = *doc.get_pages().get(&1).expect("page 1");
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    page.get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect()
}

fn template_like_image() -> RgbImage {
    let mut image = RgbImage::from_pixel(248, 350, Rgb([255, 255, 255]));
    for x in 20..228 {
        image.put_pixel(x, 40, Rgb([0, 0, 0]));
    }
    image
}

#[test]
fn test_emit_native_dpi_file() {
    let dir = scratch_dir("native");
    let path = dir.join("form.pdf");

    emit(&template_like_image(), &path, PageSizing::native(30.0)).expect("Failed to emit");

    let doc = Document::load(&path).expect("Failed to reload PDF");
    assert_eq!(doc.get_pages().len(), 1);

    // 248 px / 30 dpi * 72 = 595.2, 350 px / 30 dpi * 72 = 840
    let mb = media_box(&doc);
    assert!((mb[2] - 595.2).abs() < 1e-2, "{mb:?}");
    assert!((mb[3] - 840.0).abs() < 1e-2, "{mb:?}");

    // Exactly one file was produced
    let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_emit_fixed_page_file() {
    let dir = scratch_dir("fixed");
    let path = dir.join("form.pdf");

    emit(&template_like_image(), &path, PageSizing::fixed(PageSize::A4)).expect("Failed to emit");

    let doc = Document::load(&path).expect("Failed to reload PDF");
    let mb = media_box(&doc);
    assert!((mb[2] as f64 - PageSize::A4.width).abs() < 1e-2);
    assert!((mb[3] as f64 - PageSize::A4.height).abs() < 1e-2);
}

#[test]
fn test_emit_missing_directory() {
    let dir = scratch_dir("missing");
    let path = dir.join("does-not-exist").join("form.pdf");

    let err = emit(&template_like_image(), &path, PageSizing::default()).unwrap_err();
    assert!(matches!(err, PdfError::IoError(_)));

    // Nothing left behind in the scratch dir
    let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
    assert!(entries.is_empty());
}

#[test]
fn test_emit_overwrites_existing() {
    let dir = scratch_dir("overwrite");
    let path = dir.join("form.pdf");
    std::fs::write(&path, b"stale").unwrap();

    emit(&template_like_image(), &path, PageSizing::default()).expect("Failed to emit");

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_same_image_same_bytes() {
    let image = template_like_image();
    let mut first = PdfDocument::from_image(&image, PageSizing::default()).unwrap();
    let mut second = PdfDocument::from_image(&image, PageSizing::default()).unwrap();

    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
}

#[test]
fn test_empty_image_rejected() {
    let image = RgbImage::new(0, 0);
    let err = PdfDocument::from_image(&image, PageSizing::default())
        .err()
        .expect("empty image must fail");
    assert!(matches!(err, PdfError::InvalidImage(_)));
}

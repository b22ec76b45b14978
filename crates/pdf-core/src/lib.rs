//! PDF Core - single-page PDF emission
//!
//! This crate provides functionality for:
//! - Embedding a filled raster form as the sole content of a page
//! - Sizing the page from the image's pixel size at a fixed DPI
//! - Fitting the image onto a standard page (A4, Letter) with centering
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{emit, PageSizing};
//!
//! let filled = image::open("filled.png")?.to_rgb8();
//! emit(&filled, "out/candidate.pdf", PageSizing::native(300.0))?;
//! ```

mod document;
mod image;
mod page;

pub use document::PdfDocument;
pub use image::{calculate_scaled_dimensions, ImageScaleMode};
pub use page::{PageSize, PageSizing, Placement, DEFAULT_DPI, POINTS_PER_INCH};

use ::image::RgbImage;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid page sizing: {0}")]
    InvalidSizing(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Write `image` as a one-page PDF at `path`
///
/// Exactly one file is created. The parent directory must already exist;
/// otherwise an `IoError` is returned and nothing is written.
pub fn emit<P: AsRef<Path>>(image: &RgbImage, path: P, sizing: PageSizing) -> Result<()> {
    let mut doc = PdfDocument::from_image(image, sizing)?;
    doc.save(path)
}

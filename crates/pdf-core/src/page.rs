//! Page sizing strategies

use crate::image::{calculate_scaled_dimensions, ImageScaleMode};
use crate::{PdfError, Result};
use serde::{Deserialize, Serialize};

/// PDF user-space units per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Resolution assumed for native-DPI pages
pub const DEFAULT_DPI: f64 = 300.0;

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 (210 × 297 mm)
    pub const A4: PageSize = PageSize {
        width: 595.275_590_551_181_2,
        height: 841.889_763_779_527_7,
    };

    /// US Letter (8.5 × 11 in)
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

fn default_dpi() -> f64 {
    DEFAULT_DPI
}

/// How the page is sized relative to the embedded image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PageSizing {
    /// Page = image pixels ÷ DPI, image fills the page exactly
    NativeDpi {
        #[serde(default = "default_dpi")]
        dpi: f64,
    },
    /// Fixed page, image scaled uniformly and centered
    FixedPage {
        #[serde(default)]
        size: PageSize,
    },
}

impl PageSizing {
    pub fn native(dpi: f64) -> Self {
        PageSizing::NativeDpi { dpi }
    }

    pub fn fixed(size: PageSize) -> Self {
        PageSizing::FixedPage { size }
    }

    /// Compute the page size and the image rectangle on it
    ///
    /// Coordinates are PDF points with the origin at the bottom-left.
    pub fn place(&self, image_width: u32, image_height: u32) -> Result<Placement> {
        if image_width == 0 || image_height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "image has zero size ({image_width}x{image_height})"
            )));
        }

        match *self {
            PageSizing::NativeDpi { dpi } => {
                if !dpi.is_finite() || dpi <= 0.0 {
                    return Err(PdfError::InvalidSizing(format!("dpi must be positive, got {dpi}")));
                }
                let width = image_width as f64 / dpi * POINTS_PER_INCH;
                let height = image_height as f64 / dpi * POINTS_PER_INCH;
                Ok(Placement {
                    page: PageSize::new(width, height),
                    x: 0.0,
                    y: 0.0,
                    width,
                    height,
                })
            }
            PageSizing::FixedPage { size } => {
                if !(size.width > 0.0 && size.height > 0.0) {
                    return Err(PdfError::InvalidSizing(format!(
                        "page size must be positive, got {}x{}",
                        size.width, size.height
                    )));
                }
                let (width, height) = calculate_scaled_dimensions(
                    image_width,
                    image_height,
                    size.width,
                    size.height,
                    ImageScaleMode::FitBox,
                );
                Ok(Placement {
                    page: size,
                    x: (size.width - width) / 2.0,
                    y: (size.height - height) / 2.0,
                    width,
                    height,
                })
            }
        }
    }
}

impl Default for PageSizing {
    fn default() -> Self {
        PageSizing::NativeDpi { dpi: DEFAULT_DPI }
    }
}

/// Resolved page size and image rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Page (MediaBox) size
    pub page: PageSize,
    /// Image left edge in points
    pub x: f64,
    /// Image bottom edge in points
    pub y: f64,
    /// Drawn image width in points
    pub width: f64,
    /// Drawn image height in points
    pub height: f64,
}

//! Font loading, measurement and drawing
//!
//! Two font kinds are supported:
//! - Outline fonts (TTF/OTF) through `ab_glyph`, with kerning
//! - The built-in Spleen 12x24 bitmap font, integer scaled
//!
//! The built-in font is always available, so a font problem never stops
//! a batch; [`FormFont::load`] reports the fallback instead.

use crate::config::MAX_FONT_SIZE;
use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use spleen_font::{PSF2Font, FONT_12X24};
use std::fmt;
use std::path::{Path, PathBuf};

/// Cell size of the built-in font at scale 1
const BUILTIN_CELL_WIDTH: u32 = 12;
const BUILTIN_CELL_HEIGHT: u32 = 24;

/// Why a configured font was replaced by the built-in font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFallback {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for FontFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot use font {}: {}", self.path.display(), self.reason)
    }
}

/// A font usable for measuring and drawing field text
///
/// Immutable and cheap to clone; safe to share across worker threads.
#[derive(Clone)]
pub enum FormFont {
    Outline(FontArc),
    Builtin,
}

impl fmt::Debug for FormFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormFont::Outline(_) => f.write_str("FormFont::Outline"),
            FormFont::Builtin => f.write_str("FormFont::Builtin"),
        }
    }
}

impl FormFont {
    /// Load the configured font, falling back to the built-in font
    ///
    /// `None` selects the built-in font without a fallback report.
    pub fn load(path: Option<&Path>) -> (Self, Option<FontFallback>) {
        let Some(path) = path else {
            return (FormFont::Builtin, None);
        };

        let fallback = |reason: String| FontFallback {
            path: path.to_path_buf(),
            reason,
        };

        match std::fs::read(path) {
            Ok(data) => match Self::from_bytes(data) {
                Ok(font) => (font, None),
                Err(reason) => (FormFont::Builtin, Some(fallback(reason))),
            },
            Err(err) => (FormFont::Builtin, Some(fallback(err.to_string()))),
        }
    }

    /// Parse an outline font from TTF/OTF bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, String> {
        FontArc::try_from_vec(data)
            .map(FormFont::Outline)
            .map_err(|e| e.to_string())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FormFont::Builtin)
    }

    /// Rendered `(width, height)` of a single line in pixels
    ///
    /// Height is the font's ascent-to-descent extent, independent of the
    /// characters in `text`.
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        match self {
            FormFont::Outline(font) => {
                let scaled = font.as_scaled(outline_scale(font, size));
                let mut width = 0.0f32;
                let mut previous = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    previous = Some(id);
                }
                let height = scaled.ascent() - scaled.descent();
                (width.max(0.0).ceil() as u32, height.max(0.0).ceil() as u32)
            }
            FormFont::Builtin => {
                let k = builtin_scale(size);
                let chars = text.chars().count() as u32;
                (
                    chars.saturating_mul(BUILTIN_CELL_WIDTH * k),
                    BUILTIN_CELL_HEIGHT * k,
                )
            }
        }
    }

    /// Draw one line with its top-left at (x, y), clipped to the canvas
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        x: i64,
        y: i64,
        size: f32,
        color: Rgb<u8>,
    ) {
        match self {
            FormFont::Outline(font) => draw_outline(font, canvas, text, x, y, size, color),
            FormFont::Builtin => draw_builtin(canvas, text, x, y, builtin_scale(size), color),
        }
    }
}

/// Scale whose em square is `size` pixels
fn outline_scale(font: &FontArc, size: f32) -> PxScale {
    let size = size.min(MAX_FONT_SIZE);
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(size * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(size),
    }
}

/// Integer magnification of the 24 px bitmap font nearest to `size`,
/// with `size` capped at [`MAX_FONT_SIZE`]
fn builtin_scale(size: f32) -> u32 {
    ((size.min(MAX_FONT_SIZE) / BUILTIN_CELL_HEIGHT as f32).round() as u32).max(1)
}

fn draw_outline(
    font: &FontArc,
    canvas: &mut RgbImage,
    text: &str,
    x: i64,
    y: i64,
    size: f32,
    color: Rgb<u8>,
) {
    let scale = outline_scale(font, size);
    let scaled = font.as_scaled(scale);
    let baseline = y as f32 + scaled.ascent();

    let mut caret = x as f32;
    let mut previous = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let gx = bounds.min.x as i64 + px as i64;
                let gy = bounds.min.y as i64 + py as i64;
                blend(canvas, gx, gy, color, coverage);
            });
        }

        caret += scaled.h_advance(id);
        previous = Some(id);
    }
}

fn draw_builtin(canvas: &mut RgbImage, text: &str, x: i64, y: i64, k: u32, color: Rgb<u8>) {
    let Ok(mut spleen) = PSF2Font::new(FONT_12X24) else {
        return;
    };
    let k = k as i64;
    let advance = BUILTIN_CELL_WIDTH as i64 * k;

    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as i64 * advance;
        let mut buf = [0u8; 4];
        let Some(glyph) = spleen.glyph_for_utf8(ch.encode_utf8(&mut buf).as_bytes()) else {
            continue;
        };

        for (row, bits) in glyph.enumerate() {
            for (col, on) in bits.enumerate() {
                if !on || col >= BUILTIN_CELL_WIDTH as usize {
                    continue;
                }
                let px = origin_x + col as i64 * k;
                let py = y + row as i64 * k;
                for dy in 0..k {
                    for dx in 0..k {
                        blend(canvas, px + dx, py + dy, color, 1.0);
                    }
                }
            }
        }
    }
}

/// Mix `color` into the pixel by `coverage`; out-of-canvas pixels are ignored
pub(crate) fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        let mixed = *dst as f32 * (1.0 - coverage) + src as f32 * coverage;
        *dst = mixed.round() as u8;
    }
}

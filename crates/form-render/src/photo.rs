//! Photo compositing into the reserved photo box

use crate::config::PhotoFit;
use crate::font::{blend, FormFont};
use crate::renderer::FieldStatus;
use crate::FieldBox;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;

/// Placeholder label size (built-in font at scale 1)
const PLACEHOLDER_LABEL_SIZE: f32 = 24.0;

pub(crate) const LABEL_MISSING: &str = "Photo missing";
pub(crate) const LABEL_ERROR: &str = "Photo error";

/// Paste the photo at `path` into `field`
///
/// Never fails: problems are returned as a skipped status and the canvas
/// is left untouched.
pub(crate) fn composite_photo(
    canvas: &mut RgbImage,
    field: &FieldBox,
    path: Option<&Path>,
    fit: PhotoFit,
) -> FieldStatus {
    if field.w == 0 || field.h == 0 {
        return FieldStatus::SkippedError("photo box has zero area".to_string());
    }

    let Some(path) = path.filter(|p| p.is_file()) else {
        return FieldStatus::SkippedMissing;
    };

    let photo = match image::open(path) {
        Ok(photo) => photo.to_rgb8(),
        Err(err) => {
            log::warn!("Cannot decode photo {}: {err}", path.display());
            return FieldStatus::SkippedError(err.to_string());
        }
    };
    if photo.width() == 0 || photo.height() == 0 {
        log::warn!("Photo {} is empty", path.display());
        return FieldStatus::SkippedError("photo has zero size".to_string());
    }

    let (width, height) = match fit {
        PhotoFit::Stretch => (field.w, field.h),
        PhotoFit::Contain => contain_size(photo.width(), photo.height(), field.w, field.h),
    };
    let x = field.x as i64 + (field.w - width) as i64 / 2;
    let y = field.y as i64 + (field.h - height) as i64 / 2;

    let Some(visible) = clip_to_canvas(canvas, x, y, width, height) else {
        log::warn!("Photo box at ({x}, {y}) lies outside the template");
        return FieldStatus::SkippedError("photo box lies outside the template".to_string());
    };

    // Only the visible part is resampled, from the matching source region
    let resized = if visible == (x, y, width, height) {
        imageops::resize(&photo, width, height, FilterType::Lanczos3)
    } else {
        let (vx, vy, vw, vh) = visible;
        let (sx, sw) = source_span(vx - x, vw, width, photo.width());
        let (sy, sh) = source_span(vy - y, vh, height, photo.height());
        let region = imageops::crop_imm(&photo, sx, sy, sw, sh).to_image();
        imageops::resize(&region, vw, vh, FilterType::Lanczos3)
    };
    imageops::replace(canvas, &resized, visible.0, visible.1);

    FieldStatus::Rendered
}

/// Part of the rectangle at (x, y) that lands on the canvas
fn clip_to_canvas(
    canvas: &RgbImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
) -> Option<(i64, i64, u32, u32)> {
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + width as i64).min(canvas.width() as i64);
    let bottom = (y + height as i64).min(canvas.height() as i64);
    if left >= right || top >= bottom {
        return None;
    }
    Some((left, top, (right - left) as u32, (bottom - top) as u32))
}

/// Source pixels `(start, len)` covering `[offset, offset + len)` of a
/// `dest`-pixel span resampled from `source` pixels
fn source_span(offset: i64, len: u32, dest: u32, source: u32) -> (u32, u32) {
    let ratio = source as f64 / dest as f64;
    let start = ((offset as f64 * ratio).floor() as u32).min(source - 1);
    let end = (((offset + len as i64) as f64 * ratio).ceil() as u32).clamp(start + 1, source);
    (start, end - start)
}

/// Largest size with the photo's aspect ratio that fits the box
fn contain_size(photo_w: u32, photo_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let scale = (box_w as f64 / photo_w as f64).min(box_h as f64 / photo_h as f64);
    let width = ((photo_w as f64 * scale).round() as u32).clamp(1, box_w);
    let height = ((photo_h as f64 * scale).round() as u32).clamp(1, box_h);
    (width, height)
}

/// Outline the box (corners inclusive) and write `label` inside it
pub(crate) fn draw_placeholder(
    canvas: &mut RgbImage,
    field: &FieldBox,
    label: &str,
    font: &FormFont,
    color: Rgb<u8>,
) {
    let left = field.x as i64;
    let top = field.y as i64;
    let right = left + field.w as i64;
    let bottom = top + field.h as i64;

    for x in left..=right {
        blend(canvas, x, top, color, 1.0);
        blend(canvas, x, bottom, color, 1.0);
    }
    for y in top..=bottom {
        blend(canvas, left, y, color, 1.0);
        blend(canvas, right, y, color, 1.0);
    }

    font.draw(canvas, label, left + 2, top + 2, PLACEHOLDER_LABEL_SIZE, color);
}

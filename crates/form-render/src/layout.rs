//! Text placement inside a field box
//!
//! Layout is pure: it only needs a measuring function, so it can be
//! tested without drawing anything.
//!
//! - A value that fits the box width is placed as a single line.
//! - A wider value is greedily wrapped on spaces. Lines are stacked at a
//!   fixed line height and the block is centered (or top-aligned).
//! - Wrapped lines whose bottom edge falls below the box are dropped.
//! - An empty wrapped line (before an over-wide first word) occupies a
//!   slot but is neither placed nor counted as dropped.

use crate::config::{TextAlign, VerticalAlign};
use crate::FieldBox;
use form_text::wrap_to_width;

/// One line of text with its top-left draw position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub width: u32,
}

/// Result of laying out one field value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLayout {
    pub lines: Vec<PlacedLine>,
    /// Wrapped lines that did not fit vertically
    pub dropped: usize,
}

/// Lay out `value` inside `field`
///
/// `measure` returns the `(width, height)` of a single line.
/// `line_spacing` is added to the measured height between wrapped lines.
pub fn layout_text<F>(
    value: &str,
    field: &FieldBox,
    align: TextAlign,
    valign: VerticalAlign,
    line_spacing: i32,
    measure: F,
) -> TextLayout
where
    F: Fn(&str) -> (u32, u32),
{
    let box_x = field.x as i64;
    let box_y = field.y as i64;
    let box_w = field.w as i64;
    let box_h = field.h as i64;

    let line_x = |width: u32| match align {
        TextAlign::Left => box_x,
        TextAlign::Center => box_x + (box_w - width as i64).div_euclid(2),
    };

    let (text_width, text_height) = measure(value);
    if text_width <= field.w {
        let y = match valign {
            VerticalAlign::Center => box_y + (box_h - text_height as i64).div_euclid(2),
            VerticalAlign::Top => box_y,
        };
        return TextLayout {
            lines: vec![PlacedLine {
                text: value.to_string(),
                x: line_x(text_width),
                y,
                width: text_width,
            }],
            dropped: 0,
        };
    }

    let wrapped = wrap_to_width(value, field.w, |s| measure(s).0);
    let line_height = (text_height as i64 + line_spacing as i64).max(1);
    let block_height = wrapped.len() as i64 * line_height;
    let start_y = match valign {
        VerticalAlign::Center => box_y + (box_h - block_height).div_euclid(2),
        VerticalAlign::Top => box_y,
    };

    let mut layout = TextLayout::default();
    for (i, text) in wrapped.into_iter().enumerate() {
        let y = start_y + i as i64 * line_height;
        if text.is_empty() {
            continue;
        }
        if y + line_height > box_y + box_h {
            layout.dropped += 1;
            continue;
        }
        let width = measure(&text).0;
        layout.lines.push(PlacedLine {
            x: line_x(width),
            y,
            width,
            text,
        });
    }
    layout
}

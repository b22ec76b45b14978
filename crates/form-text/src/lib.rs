//! Form Text - text utilities for filling form fields
//!
//! This crate provides:
//! - Field-name normalization and first-match key lookup
//! - Date parsing and fixed-format rendering
//! - Greedy word wrapping against a caller-supplied width measure
//!
//! # Example
//!
//! ```ignore
//! use form_text::{normalize_key, format_date, wrap_to_width, KeyIndex};
//!
//! assert_eq!(normalize_key(" Date_Of_Birth "), "date of birth");
//!
//! let index = KeyIndex::new(["Name", "NAME"]);
//! assert_eq!(index.get("name"), Some(0));
//!
//! let dob = format_date("2024-03-05", "%d/%m/%Y");  // Some("05/03/2024")
//! let lines = wrap_to_width("a long address", 80, |s| s.len() as u32 * 12);
//! ```

mod date;
mod normalize;
mod wrap;

pub use date::{format_date, format_serial_date, parse_date, serial_to_date, DEFAULT_DATE_FORMAT};
pub use normalize::{normalize_key, KeyIndex};
pub use wrap::wrap_to_width;

/// Join the non-empty (after trimming) parts with a separator
///
/// Used for fields whose value is composed from several columns,
/// e.g. an address built from line 1, line 2, city and state.
pub fn join_non_empty<I, S>(parts: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref().trim();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(separator);
        }
        out.push_str(part);
    }
    out
}

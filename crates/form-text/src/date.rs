//! Date parsing and formatting for date-like fields

use chrono::{Days, NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Output format used when a date rule doesn't name one (DD/MM/YYYY)
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Accepted date-only input layouts, tried in order
const DATE_INPUTS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Accepted date-time input layouts (time part is discarded)
const DATETIME_INPUTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Largest spreadsheet serial day number (9999-12-31)
const MAX_SERIAL: f64 = 2_958_465.0;

/// Parse a raw cell value as a calendar date
///
/// Returns `None` for empty input or when no accepted layout matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for layout in DATE_INPUTS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, layout) {
            return Some(date);
        }
    }

    DATETIME_INPUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|dt| dt.date())
}

/// Convert a spreadsheet serial day number (epoch 1899-12-30) to a date
///
/// The fractional part (time of day) is ignored.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

/// Parse `raw` and render it with a strftime-style `format`
///
/// # Example
/// ```ignore
/// assert_eq!(format_date("2024-03-05", "%d/%m/%Y"), Some("05/03/2024".to_string()));
/// ```
pub fn format_date(raw: &str, format: &str) -> Option<String> {
    parse_date(raw).and_then(|date| render(date, format))
}

/// Render a spreadsheet serial day number with a strftime-style `format`
pub fn format_serial_date(serial: f64, format: &str) -> Option<String> {
    serial_to_date(serial).and_then(|date| render(date, format))
}

fn render(date: NaiveDate, format: &str) -> Option<String> {
    // An invalid format specifier surfaces as fmt::Error rather than a panic here
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_iso_date() {
        assert_eq!(
            format_date("2024-03-05", DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
    }

    #[test]
    fn test_day_first_inputs() {
        assert_eq!(
            format_date("05-03-2024", DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
        assert_eq!(
            format_date("5/3/2024", DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
        assert_eq!(
            format_date("05.03.2024", DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
    }

    #[test]
    fn test_datetime_input() {
        assert_eq!(
            format_date("2024-03-05 00:00:00", DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
        assert_eq!(
            format_date("2024-03-05T13:45:00", DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(format_date("", DEFAULT_DATE_FORMAT), None);
        assert_eq!(format_date("   ", DEFAULT_DATE_FORMAT), None);
        assert_eq!(format_date("not a date", DEFAULT_DATE_FORMAT), None);
        assert_eq!(format_date("2024-13-40", DEFAULT_DATE_FORMAT), None);
    }

    #[test]
    fn test_custom_output_format() {
        assert_eq!(
            format_date("2024-03-05", "%d-%m-%Y"),
            Some("05-03-2024".to_string())
        );
    }

    #[test]
    fn test_invalid_output_format() {
        assert_eq!(format_date("2024-03-05", "%Q"), None);
    }

    #[test]
    fn test_serial_dates() {
        // 45356 is 2024-03-05 in spreadsheet serial days
        assert_eq!(
            format_serial_date(45356.0, DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
        assert_eq!(
            format_serial_date(45356.75, DEFAULT_DATE_FORMAT),
            Some("05/03/2024".to_string())
        );
        assert_eq!(serial_to_date(0.0), None);
        assert_eq!(serial_to_date(f64::NAN), None);
        assert_eq!(serial_to_date(1e9), None);
    }
}

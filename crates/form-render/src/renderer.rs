//! Field renderer: fills one copy of the template per candidate

use crate::config::{FieldTransform, FormConfig, MissingPhotoPolicy};
use crate::font::{FontFallback, FormFont};
use crate::layout::layout_text;
use crate::photo::{composite_photo, draw_placeholder, LABEL_ERROR, LABEL_MISSING};
use crate::record::{CandidateRecord, RecordView};
use crate::schema::{FieldBox, Mapping};
use form_text::{format_date, format_serial_date, join_non_empty};
use image::RgbImage;
use pdf_core::PageSizing;
use serde_json::Value;
use std::path::Path;

/// Outcome of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Rendered,
    /// No value (or no photo) was available; nothing was drawn
    SkippedMissing,
    /// A value or photo was present but unusable
    SkippedError(String),
}

/// Per-field entry of a render report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub name: String,
    pub status: FieldStatus,
    /// Wrapped lines that did not fit the box height
    pub dropped_lines: usize,
}

/// A filled template and what happened to each field
#[derive(Debug, Clone)]
pub struct RenderedForm {
    pub image: RgbImage,
    pub fields: Vec<FieldReport>,
}

impl RenderedForm {
    /// Status of a field by its mapping name
    pub fn status(&self, name: &str) -> Option<&FieldStatus> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.status)
    }

    /// Total wrapped lines dropped across all fields
    pub fn dropped_lines(&self) -> usize {
        self.fields.iter().map(|f| f.dropped_lines).sum()
    }

    /// Write the filled image as a one-page PDF
    pub fn save_pdf<P: AsRef<Path>>(&self, path: P, sizing: PageSizing) -> crate::Result<()> {
        pdf_core::emit(&self.image, path, sizing)?;
        Ok(())
    }
}

/// Renders candidate records onto a template using one mapping
///
/// The renderer holds only read-only state and can be shared across
/// threads; every call to [`render`](Self::render) starts from a fresh
/// copy of the template.
pub struct FieldRenderer {
    mapping: Mapping,
    config: FormConfig,
    font: FormFont,
    font_fallback: Option<FontFallback>,
}

impl FieldRenderer {
    /// Create a renderer, loading the configured font
    ///
    /// A font that cannot be loaded is replaced by the built-in font and
    /// reported once here.
    pub fn new(mapping: Mapping, config: FormConfig) -> Self {
        let (font, font_fallback) = FormFont::load(config.font_path.as_deref());
        if let Some(fallback) = &font_fallback {
            log::warn!("{fallback}; using built-in font");
        }
        Self {
            mapping,
            config,
            font,
            font_fallback,
        }
    }

    /// Create a renderer with an already loaded font
    pub fn with_font(mapping: Mapping, config: FormConfig, font: FormFont) -> Self {
        Self {
            mapping,
            config,
            font,
            font_fallback: None,
        }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn font(&self) -> &FormFont {
        &self.font
    }

    /// Why the configured font was not used, if it was not
    pub fn font_fallback(&self) -> Option<&FontFallback> {
        self.font_fallback.as_ref()
    }

    /// Warn when the mapping was drawn against a different template size
    ///
    /// Coordinates are used as-is either way. Returns the recorded size
    /// on mismatch.
    pub fn check_template(&self, template: &RgbImage) -> Option<[u32; 2]> {
        let (width, height) = template.dimensions();
        let recorded = self.mapping.size_mismatch(width, height)?;
        log::warn!(
            "Mapping was made for a {}x{} template but the template is {width}x{height}; using coordinates as-is",
            recorded[0],
            recorded[1]
        );
        Some(recorded)
    }

    /// Fill every mapped field for one candidate
    ///
    /// The template is never modified. Missing values and photo problems
    /// are reported per field, never returned as errors.
    pub fn render(
        &self,
        template: &RgbImage,
        record: &CandidateRecord,
        photo: Option<&Path>,
    ) -> RenderedForm {
        let mut image = template.clone();
        let view = record.view();

        let fields = self
            .mapping
            .fields()
            .map(|(name, field)| {
                let (status, dropped_lines) = if self.config.is_photo_field(name) {
                    (self.render_photo(&mut image, field, photo), 0)
                } else {
                    self.render_text(&mut image, name, field, &view)
                };
                FieldReport {
                    name: name.to_string(),
                    status,
                    dropped_lines,
                }
            })
            .collect();

        RenderedForm { image, fields }
    }

    fn render_photo(
        &self,
        image: &mut RgbImage,
        field: &FieldBox,
        photo: Option<&Path>,
    ) -> FieldStatus {
        let status = composite_photo(image, field, photo, self.config.photo_fit);

        if self.config.on_missing_photo == MissingPhotoPolicy::DrawPlaceholder {
            let label = match &status {
                FieldStatus::Rendered => None,
                FieldStatus::SkippedMissing => Some(LABEL_MISSING),
                FieldStatus::SkippedError(_) => Some(LABEL_ERROR),
            };
            if let Some(label) = label {
                draw_placeholder(image, field, label, &self.font, self.config.color());
            }
        }
        status
    }

    fn render_text(
        &self,
        image: &mut RgbImage,
        name: &str,
        field: &FieldBox,
        view: &RecordView<'_>,
    ) -> (FieldStatus, usize) {
        let style = self.config.rules.resolve(name);
        let value = match resolve_value(view, name, style.transform) {
            Ok(value) => value,
            Err(status) => return (status, 0),
        };

        let size = style.font_size.unwrap_or(self.config.font_size);
        let layout = layout_text(
            &value,
            field,
            self.config.text_align,
            self.config.vertical_align,
            self.config.line_spacing,
            |s| self.font.measure(s, size),
        );

        let color = self.config.color();
        for line in &layout.lines {
            self.font.draw(image, &line.text, line.x, line.y, size, color);
        }
        (FieldStatus::Rendered, layout.dropped)
    }
}

/// Text to draw for a field, or the reason it is skipped
fn resolve_value(
    view: &RecordView<'_>,
    name: &str,
    transform: Option<&FieldTransform>,
) -> Result<String, FieldStatus> {
    match transform {
        None => view.text(name).ok_or(FieldStatus::SkippedMissing),
        Some(FieldTransform::Date { format }) => resolve_date(view.get(name), format),
        Some(FieldTransform::Join { columns, separator }) => {
            let parts = columns.iter().map(|c| view.text(c).unwrap_or_default());
            let joined = join_non_empty(parts, separator);
            if joined.is_empty() {
                view.text(name).ok_or(FieldStatus::SkippedMissing)
            } else {
                Ok(joined)
            }
        }
    }
}

fn resolve_date(raw: Option<&Value>, format: &str) -> Result<String, FieldStatus> {
    let unparseable = |raw: &dyn std::fmt::Display| {
        FieldStatus::SkippedError(format!("unrecognized date '{raw}'"))
    };

    match raw {
        None | Some(Value::Null) => Err(FieldStatus::SkippedMissing),
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(|serial| format_serial_date(serial, format))
            .ok_or_else(|| unparseable(n)),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(FieldStatus::SkippedMissing);
            }
            format_date(s, format)
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .and_then(|serial| format_serial_date(serial, format))
                })
                .ok_or_else(|| unparseable(&s))
        }
        Some(other) => Err(unparseable(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldRule, FieldRules, TextAlign};
    use image::Rgb;
    use pretty_assertions::assert_eq;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn template() -> RgbImage {
        RgbImage::from_pixel(400, 200, WHITE)
    }

    fn renderer(fields: &[(&str, FieldBox)], config: FormConfig) -> FieldRenderer {
        let mut mapping = Mapping::new(400, 200);
        for (name, field) in fields {
            mapping.insert_field(name, *field);
        }
        FieldRenderer::new(mapping, config)
    }

    fn ink(image: &RgbImage) -> usize {
        image.pixels().filter(|p| **p != WHITE).count()
    }

    #[test]
    fn test_missing_value_skipped() {
        let r = renderer(&[("Name", FieldBox::new(0, 0, 200, 50))], FormConfig::default());
        let filled = r.render(&template(), &CandidateRecord::new(), None);

        assert_eq!(filled.status("Name"), Some(&FieldStatus::SkippedMissing));
        assert_eq!(ink(&filled.image), 0);
    }

    #[test]
    fn test_text_rendered_inside_box() {
        let r = renderer(&[("Name", FieldBox::new(20, 40, 300, 60))], FormConfig::default());
        let record = CandidateRecord::new().with("name", "Ravi");
        let filled = r.render(&template(), &record, None);

        assert_eq!(filled.status("Name"), Some(&FieldStatus::Rendered));
        for (x, y, pixel) in filled.image.enumerate_pixels() {
            if *pixel != WHITE {
                assert!((20..320).contains(&x) && (40..100).contains(&y), "({x}, {y})");
            }
        }
        assert!(ink(&filled.image) > 0);
    }

    #[test]
    fn test_template_not_mutated() {
        let template = template();
        let r = renderer(&[("Name", FieldBox::new(0, 0, 300, 60))], FormConfig::default());
        let record = CandidateRecord::new().with("Name", "Ravi");
        let _ = r.render(&template, &record, None);
        assert_eq!(ink(&template), 0);
    }

    #[test]
    fn test_date_field_transform() {
        let view_record = CandidateRecord::new()
            .with("DOB", "2024-03-05")
            .with("TED", 45356)
            .with("TSD", "not a date")
            .with("Date of Birth", "");
        let view = view_record.view();
        let date = FieldTransform::date();

        assert_eq!(resolve_value(&view, "DOB", Some(&date)), Ok("05/03/2024".to_string()));
        assert_eq!(resolve_value(&view, "TED", Some(&date)), Ok("05/03/2024".to_string()));
        assert!(matches!(
            resolve_value(&view, "TSD", Some(&date)),
            Err(FieldStatus::SkippedError(_))
        ));
        assert_eq!(
            resolve_value(&view, "Date of Birth", Some(&date)),
            Err(FieldStatus::SkippedMissing)
        );
        assert_eq!(
            resolve_value(&view, "Exam Date", Some(&date)),
            Err(FieldStatus::SkippedMissing)
        );
    }

    #[test]
    fn test_address_join_and_fallback() {
        let join = FieldTransform::join(&["address line 1", "address line 2", "city", "state"]);

        let record = CandidateRecord::new()
            .with("Address_Line_1", "12 Park Street")
            .with("Address Line 2", "")
            .with("City", "Kolkata")
            .with("State", "West Bengal");
        assert_eq!(
            resolve_value(&record.view(), "Address", Some(&join)),
            Ok("12 Park Street, Kolkata, West Bengal".to_string())
        );

        let record = CandidateRecord::new().with("Address", "PO Box 7");
        assert_eq!(
            resolve_value(&record.view(), "Address", Some(&join)),
            Ok("PO Box 7".to_string())
        );

        assert_eq!(
            resolve_value(&CandidateRecord::new().view(), "Address", Some(&join)),
            Err(FieldStatus::SkippedMissing)
        );
    }

    #[test]
    fn test_font_size_override() {
        let field = FieldBox::new(0, 0, 400, 100);
        let record = CandidateRecord::new().with("Name", "AB");

        let small = renderer(&[("Name", field)], FormConfig::default());
        let config = FormConfig {
            rules: FieldRules::new(vec![FieldRule::new("name").with_font_size(96.0)]),
            ..FormConfig::default()
        };
        let large = renderer(&[("Name", field)], config);

        let small_ink = ink(&small.render(&template(), &record, None).image);
        let large_ink = ink(&large.render(&template(), &record, None).image);
        // 48 px is scale 2, 96 px is scale 4
        assert_eq!(large_ink, small_ink * 4);
    }

    #[test]
    fn test_overflow_reported() {
        let config = FormConfig {
            font_size: 24.0,
            ..FormConfig::default()
        };
        let r = renderer(&[("Remarks", FieldBox::new(10, 10, 96, 30))], config);
        let record = CandidateRecord::new().with("Remarks", "aaa bbb ccc");
        let filled = r.render(&template(), &record, None);

        assert_eq!(filled.status("Remarks"), Some(&FieldStatus::Rendered));
        assert_eq!(filled.dropped_lines(), 1);
    }

    #[test]
    fn test_left_alignment_starts_at_box_edge() {
        let config = FormConfig {
            text_align: TextAlign::Left,
            font_size: 24.0,
            ..FormConfig::default()
        };
        let r = renderer(&[("Name", FieldBox::new(50, 0, 300, 24))], config);
        let record = CandidateRecord::new().with("Name", "W");
        let filled = r.render(&template(), &record, None);

        let min_x = filled
            .image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != WHITE)
            .map(|(x, _, _)| x)
            .min()
            .unwrap();
        assert!((50..62).contains(&min_x));
    }

    #[test]
    fn test_photo_placeholder_policy() {
        let field = FieldBox::new(100, 20, 150, 120);

        let skip = renderer(&[("Photo", field)], FormConfig::default());
        let filled = skip.render(&template(), &CandidateRecord::new(), None);
        assert_eq!(filled.status("Photo"), Some(&FieldStatus::SkippedMissing));
        assert_eq!(ink(&filled.image), 0);

        let config = FormConfig {
            on_missing_photo: MissingPhotoPolicy::DrawPlaceholder,
            ..FormConfig::default()
        };
        let placeholder = renderer(&[("Photo", field)], config);
        let filled = placeholder.render(&template(), &CandidateRecord::new(), None);
        assert_eq!(filled.status("Photo"), Some(&FieldStatus::SkippedMissing));
        assert_eq!(*filled.image.get_pixel(100, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_font_fallback_reported() {
        let config = FormConfig {
            font_path: Some("/nonexistent/font.ttf".into()),
            ..FormConfig::default()
        };
        let r = renderer(&[], config);
        assert!(r.font().is_builtin());
        assert!(r.font_fallback().is_some());

        let r = renderer(&[], FormConfig::default());
        assert!(r.font_fallback().is_none());
    }

    #[test]
    fn test_check_template() {
        let r = renderer(&[], FormConfig::default());
        assert_eq!(r.check_template(&template()), None);
        assert_eq!(r.check_template(&RgbImage::new(800, 400)), Some([400, 200]));
    }
}

//! Render configuration: alignment, photo policy and per-field rules

use crate::{FormError, Result};
use form_text::{normalize_key, DEFAULT_DATE_FORMAT};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Horizontal alignment of each text line inside its box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
}

/// Vertical placement of the text block inside its box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Center,
    Top,
}

/// What to do when a photo field cannot be filled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingPhotoPolicy {
    /// Leave the box untouched
    #[default]
    Skip,
    /// Outline the box and label it
    DrawPlaceholder,
}

/// How a photo is sized into its box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhotoFit {
    /// Resize to exactly the box size
    #[default]
    Stretch,
    /// Preserve aspect ratio and center inside the box
    Contain,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_separator() -> String {
    ", ".to_string()
}

/// Value transform applied before a field is drawn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldTransform {
    /// Parse the raw value as a date and re-render it
    Date {
        #[serde(default = "default_date_format")]
        format: String,
    },
    /// Compose the value from other columns
    Join {
        columns: Vec<String>,
        #[serde(default = "default_separator")]
        separator: String,
    },
}

impl FieldTransform {
    pub fn date() -> Self {
        FieldTransform::Date {
            format: default_date_format(),
        }
    }

    pub fn join(columns: &[&str]) -> Self {
        FieldTransform::Join {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            separator: default_separator(),
        }
    }

    /// Whether this transform composes its value from `normalized_field`
    fn reads_column(&self, normalized_field: &str) -> bool {
        match self {
            FieldTransform::Date { .. } => false,
            FieldTransform::Join { columns, .. } => columns
                .iter()
                .any(|c| normalize_key(c) == normalized_field),
        }
    }
}

/// Per-field override, selected by field-name pattern
///
/// A rule matches when its normalized pattern is a substring of the
/// normalized field name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRule {
    pub pattern: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<FieldTransform>,
}

impl FieldRule {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            font_size: None,
            transform: None,
        }
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_transform(mut self, transform: FieldTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    fn matches(&self, normalized_field: &str) -> bool {
        let pattern = normalize_key(&self.pattern);
        !pattern.is_empty() && normalized_field.contains(&pattern)
    }
}

/// Ordered rule table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FieldRules(Vec<FieldRule>);

/// Attributes resolved for one field
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldStyle<'a> {
    pub font_size: Option<f32>,
    pub transform: Option<&'a FieldTransform>,
}

impl FieldRules {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self(rules)
    }

    /// No overrides at all
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Date reformatting for birth/exam date columns and a composed address
    pub fn standard() -> Self {
        let mut rules: Vec<FieldRule> = ["date of birth", "dob", "ted", "tsd"]
            .into_iter()
            .map(|pattern| FieldRule::new(pattern).with_transform(FieldTransform::date()))
            .collect();
        rules.push(FieldRule::new("address").with_transform(FieldTransform::join(&[
            "address line 1",
            "address line 2",
            "city",
            "district",
            "state",
        ])));
        Self(rules)
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.0
    }

    /// Resolve attributes for a field; the first matching rule that sets
    /// an attribute wins for that attribute. A join never applies to a
    /// field that is itself one of its columns, so `Address Line 1`
    /// renders its own value.
    pub fn resolve(&self, field: &str) -> FieldStyle<'_> {
        let normalized = normalize_key(field);
        let mut style = FieldStyle::default();

        for rule in self.0.iter().filter(|r| r.matches(&normalized)) {
            if style.font_size.is_none() {
                style.font_size = rule.font_size;
            }
            if style.transform.is_none() {
                style.transform = rule
                    .transform
                    .as_ref()
                    .filter(|t| !t.reads_column(&normalized));
            }
            if style.font_size.is_some() && style.transform.is_some() {
                break;
            }
        }
        style
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Largest accepted font size in pixels
pub const MAX_FONT_SIZE: f32 = 1000.0;

fn valid_font_size(size: f32) -> bool {
    size.is_finite() && size > 0.0 && size <= MAX_FONT_SIZE
}

fn default_font_size() -> f32 {
    48.0
}

fn default_photo_fields() -> Vec<String> {
    vec!["photo".to_string(), "photo box".to_string()]
}

/// Rendering options supplied alongside a mapping
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    /// Outline font file (TTF/OTF); `None` selects the built-in font
    pub font_path: Option<PathBuf>,

    /// Pixel em size
    pub font_size: f32,

    pub text_align: TextAlign,

    pub vertical_align: VerticalAlign,

    /// Extra pixels added to the line height when wrapping
    pub line_spacing: i32,

    pub text_color: [u8; 3],

    pub on_missing_photo: MissingPhotoPolicy,

    pub photo_fit: PhotoFit,

    /// Field names (normalized) that receive the photo instead of text
    pub photo_fields: Vec<String>,

    pub rules: FieldRules,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: default_font_size(),
            text_align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            line_spacing: 0,
            text_color: [0, 0, 0],
            on_missing_photo: MissingPhotoPolicy::default(),
            photo_fit: PhotoFit::default(),
            photo_fields: default_photo_fields(),
            rules: FieldRules::default(),
        }
    }
}

impl FormConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if !valid_font_size(self.font_size) {
            return Err(FormError::ConfigError(format!(
                "font_size must be in (0, {MAX_FONT_SIZE}], got {}",
                self.font_size
            )));
        }

        for rule in self.rules.rules() {
            if normalize_key(&rule.pattern).is_empty() {
                return Err(FormError::ConfigError(
                    "rule pattern must not be empty".to_string(),
                ));
            }
            if let Some(size) = rule.font_size {
                if !valid_font_size(size) {
                    return Err(FormError::ConfigError(format!(
                        "rule '{}' has invalid font_size {size}",
                        rule.pattern
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn color(&self) -> Rgb<u8> {
        Rgb(self.text_color)
    }

    /// Whether the field receives the photo
    pub fn is_photo_field(&self, field: &str) -> bool {
        let normalized = normalize_key(field);
        self.photo_fields
            .iter()
            .any(|name| normalize_key(name) == normalized)
    }
}

//! Mapping JSON schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_box_width() -> u32 {
    100
}

fn default_box_height() -> u32 {
    30
}

/// Pixel-space rectangle of one field on the template
///
/// Boxes may extend past the template; drawing clips silently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldBox {
    /// Left edge in pixels
    #[serde(default)]
    pub x: u32,

    /// Top edge in pixels
    #[serde(default)]
    pub y: u32,

    /// Width in pixels
    #[serde(default = "default_box_width")]
    pub w: u32,

    /// Height in pixels
    #[serde(default = "default_box_height")]
    pub h: u32,
}

impl FieldBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Named field rectangles for one template image
///
/// This is the interchange format produced by the mapping editor:
///
/// ```json
/// {
///   "image_size": [2480, 3508],
///   "fields": { "Name": {"x": 757, "y": 1205, "w": 1056, "h": 50} }
/// }
/// ```
///
/// Fields iterate in name order so renders are reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Mapping {
    /// Template size the boxes were drawn against, `[width, height]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<[u32; 2]>,

    /// Field name -> box
    #[serde(default)]
    pub fields: BTreeMap<String, FieldBox>,
}

impl Mapping {
    /// Create an empty mapping for a template of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image_size: Some([width, height]),
            fields: BTreeMap::new(),
        }
    }

    /// Add or replace a field box
    pub fn insert_field(&mut self, name: &str, field: FieldBox) -> &mut Self {
        self.fields.insert(name.to_string(), field);
        self
    }

    /// Iterate fields in render order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldBox)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// The recorded size if it differs from `width` x `height`
    pub fn size_mismatch(&self, width: u32, height: u32) -> Option<[u32; 2]> {
        self.image_size.filter(|size| *size != [width, height])
    }
}

//! Form Render - coordinate-based form filling
//!
//! This crate provides:
//! - Mapping and configuration schema types
//! - Mapping/config parsing from JSON
//! - Text layout inside fixed-size boxes (wrap, center, drop overflow)
//! - Photo compositing into a reserved box
//! - A per-field render report and a parallel batch runner
//!
//! # Example
//!
//! ```ignore
//! use form_render::{parse_config, parse_mapping, CandidateRecord, FieldRenderer};
//!
//! let mapping = parse_mapping(mapping_json)?;
//! let config = parse_config("{}")?;
//! let renderer = FieldRenderer::new(mapping, config);
//!
//! let template = image::open("form.png")?.to_rgb8();
//! let record = CandidateRecord::new().with("Name", "Anita Kumar");
//! let filled = renderer.render(&template, &record, None);
//! pdf_core::emit(&filled.image, "out.pdf", pdf_core::PageSizing::default())?;
//! ```

pub mod batch;
pub mod config;
pub mod font;
pub mod layout;
pub mod parser;
mod photo;
mod record;
mod renderer;
mod schema;

pub use batch::{
    output_path, plan_outputs, run_batch, BatchOptions, BatchReport, Candidate, CandidateOutcome,
};
pub use config::{
    FieldRule, FieldRules, FieldStyle, FieldTransform, FormConfig, MissingPhotoPolicy, PhotoFit,
    TextAlign, VerticalAlign, MAX_FONT_SIZE,
};
pub use font::{FontFallback, FormFont};
pub use layout::{layout_text, PlacedLine, TextLayout};
pub use parser::{
    load_candidates, load_config, load_mapping, load_template, parse_config, parse_mapping,
};
pub use record::{CandidateRecord, RecordView};
pub use renderer::{FieldRenderer, FieldReport, FieldStatus, RenderedForm};
pub use schema::{FieldBox, Mapping};

use thiserror::Error;

/// Errors that can occur while loading or rendering forms
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Failed to parse mapping: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;

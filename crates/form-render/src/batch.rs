//! Batch runner: render and emit one PDF per candidate
//!
//! Candidates are processed in parallel. Output paths are planned up
//! front so no two candidates write the same file. A failure for one
//! candidate (cannot create its directory, cannot write its PDF) is
//! recorded in its outcome and never stops the batch.

use crate::font::FontFallback;
use crate::record::CandidateRecord;
use crate::renderer::{FieldRenderer, FieldReport, RenderedForm};
use crate::Result;
use image::RgbImage;
use pdf_core::PageSizing;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One form instance to fill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub serial: String,
    pub name: String,
    pub record: CandidateRecord,
    #[serde(default)]
    pub photo: Option<PathBuf>,
}

/// Where and how to write the batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    #[serde(default)]
    pub sizing: PageSizing,
}

/// What happened to one candidate
#[derive(Debug, Clone)]
pub struct CandidateOutcome {
    pub serial: String,
    pub name: String,
    /// Written PDF, if the candidate succeeded
    pub output: Option<PathBuf>,
    pub error: Option<String>,
    pub photo_found: bool,
    pub fields: Vec<FieldReport>,
}

impl CandidateOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of a batch, in input order
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub font_fallback: Option<FontFallback>,
    pub outcomes: Vec<CandidateOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// File-system safe stem for a candidate: `"<serial> <name>"`, trimmed,
/// with anything but alphanumerics, whitespace, `_`, `-` and `.` replaced
/// by `_`. A stem that is empty or only dots becomes underscores, so it
/// never names the current or parent directory.
pub fn safe_name(serial: &str, name: &str) -> String {
    let stem: String = format!("{serial} {name}")
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.chars().all(|c| c == '.') {
        "_".repeat(stem.len().max(1))
    } else {
        stem
    }
}

/// `<output_dir>/<safe>/<safe>_filled.pdf`
pub fn output_path(output_dir: &Path, serial: &str, name: &str) -> PathBuf {
    stem_path(output_dir, &safe_name(serial, name))
}

fn stem_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(stem).join(format!("{stem}_filled.pdf"))
}

/// Output path for every candidate, in input order
///
/// The first candidate with a given stem keeps [`output_path`]. Later
/// ones get `_2`, `_3`, ... appended, skipping any stem another
/// candidate owns. Stems are compared case-insensitively.
pub fn plan_outputs(output_dir: &Path, candidates: &[Candidate]) -> Vec<PathBuf> {
    let stems: Vec<String> = candidates
        .iter()
        .map(|c| safe_name(&c.serial, &c.name))
        .collect();
    let owned: HashSet<String> = stems.iter().map(|s| s.to_lowercase()).collect();
    let mut taken = HashSet::new();

    stems
        .iter()
        .map(|stem| {
            let mut unique = stem.clone();
            let mut n = 1;
            while taken.contains(&unique.to_lowercase())
                || (n > 1 && owned.contains(&unique.to_lowercase()))
            {
                n += 1;
                unique = format!("{stem}_{n}");
            }
            if n > 1 {
                log::warn!("Output name '{stem}' is already used; writing '{unique}'");
            }
            taken.insert(unique.to_lowercase());
            stem_path(output_dir, &unique)
        })
        .collect()
}

/// Render and emit every candidate
///
/// # Arguments
/// * `renderer` - Shared renderer (mapping, config, font)
/// * `template` - Template image, copied per candidate
/// * `candidates` - Records to fill
/// * `options` - Output directory and page sizing
pub fn run_batch(
    renderer: &FieldRenderer,
    template: &RgbImage,
    candidates: &[Candidate],
    options: &BatchOptions,
) -> BatchReport {
    renderer.check_template(template);

    let paths = plan_outputs(&options.output_dir, candidates);
    let outcomes = candidates
        .par_iter()
        .zip(paths)
        .map(|(candidate, path)| process_candidate(renderer, template, candidate, path, options))
        .collect();

    BatchReport {
        font_fallback: renderer.font_fallback().cloned(),
        outcomes,
    }
}

fn process_candidate(
    renderer: &FieldRenderer,
    template: &RgbImage,
    candidate: &Candidate,
    path: PathBuf,
    options: &BatchOptions,
) -> CandidateOutcome {
    let photo = candidate.photo.as_deref();
    let filled = renderer.render(template, &candidate.record, photo);

    let (output, error) = match write_form(&filled, &path, options.sizing) {
        Ok(()) => {
            log::debug!("Wrote {}", path.display());
            (Some(path), None)
        }
        Err(err) => {
            log::warn!(
                "Failed to write form for {} {}: {err}",
                candidate.serial,
                candidate.name
            );
            (None, Some(err.to_string()))
        }
    };

    CandidateOutcome {
        serial: candidate.serial.clone(),
        name: candidate.name.clone(),
        output,
        error,
        photo_found: photo.is_some_and(Path::is_file),
        fields: filled.fields,
    }
}

/// Create the candidate directory and emit the PDF into it
fn write_form(filled: &RenderedForm, path: &Path, sizing: PageSizing) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    filled.save_pdf(path, sizing)
}

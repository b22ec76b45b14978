//! Form Filler
//!
//! Fills a template image for every candidate and writes one PDF each.
//!
//! Usage:
//!   cargo run --example fill_forms -- <template.png> <mapping.json> <candidates.json> [config.json] [output_dir]
//!
//! `candidates.json` is an array of
//! `{"serial": "1", "name": "Anita Kumar", "record": {...}, "photo": "photos/1.jpg"}`.
//!
//! Example:
//!   cargo run --example fill_forms -- assets/admit_card.png assets/admit_card_mapping.json input/candidates.json

use form_render::{
    load_candidates, load_config, load_mapping, load_template, run_batch, BatchOptions,
    FieldRenderer, FieldStatus, FormConfig,
};
use pdf_core::PageSizing;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 4 {
        eprintln!(
            "Usage: {} <template.png> <mapping.json> <candidates.json> [config.json] [output_dir]",
            args[0]
        );
        std::process::exit(1);
    }

    let template = load_template(&args[1])?;
    let mapping = load_mapping(&args[2])?;
    let candidates = load_candidates(&args[3])
        .map_err(|e| format!("Failed to read candidates '{}': {}", args[3], e))?;

    let config = match args.get(4) {
        Some(path) => load_config(path)?,
        None => FormConfig::default(),
    };
    let output_dir = PathBuf::from(args.get(5).map(String::as_str).unwrap_or("output"));
    std::fs::create_dir_all(&output_dir)?;

    let renderer = FieldRenderer::new(mapping, config);
    let options = BatchOptions {
        output_dir,
        sizing: PageSizing::default(),
    };
    let report = run_batch(&renderer, &template, &candidates, &options);

    if let Some(fallback) = &report.font_fallback {
        println!("Font: {fallback}; used built-in font");
    }

    for outcome in &report.outcomes {
        match (&outcome.output, &outcome.error) {
            (Some(path), _) => println!("Generated: {}", path.display()),
            (None, Some(err)) => println!("FAILED {} {}: {err}", outcome.serial, outcome.name),
            (None, None) => {}
        }
        if !outcome.photo_found {
            println!("  no photo for {} {}", outcome.serial, outcome.name);
        }
        for field in &outcome.fields {
            if let FieldStatus::SkippedError(reason) = &field.status {
                println!("  {}: skipped ({reason})", field.name);
            }
            if field.dropped_lines > 0 {
                println!("  {}: {} line(s) did not fit", field.name, field.dropped_lines);
            }
        }
    }

    println!(
        "\n{} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );

    Ok(())
}

//! Mapping and configuration JSON parsing

use crate::{Candidate, FormConfig, FormError, Mapping, Result};
use image::RgbImage;
use std::path::Path;

/// Parse a mapping from JSON string
pub fn parse_mapping(json: &str) -> Result<Mapping> {
    serde_json::from_str(json).map_err(|e| FormError::ParseError(e.to_string()))
}

/// Parse and validate a render configuration from JSON string
pub fn parse_config(json: &str) -> Result<FormConfig> {
    let config: FormConfig =
        serde_json::from_str(json).map_err(|e| FormError::ConfigError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Read and parse a mapping file
pub fn load_mapping<P: AsRef<Path>>(path: P) -> Result<Mapping> {
    let json = std::fs::read_to_string(path)?;
    parse_mapping(&json)
}

/// Read and parse a configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FormConfig> {
    let json = std::fs::read_to_string(path)?;
    parse_config(&json)
}

/// Read a JSON array of candidates
pub fn load_candidates<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Decode a template image as RGB
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let template = image::open(path)
        .map_err(|e| FormError::TemplateError(format!("{}: {e}", path.display())))?
        .to_rgb8();
    if template.width() == 0 || template.height() == 0 {
        return Err(FormError::TemplateError(format!(
            "{} has zero size",
            path.display()
        )));
    }
    Ok(template)
}

/// Convert a JSON value to string for rendering
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldBox, TextAlign};
    use serde_json::json;

    #[test]
    fn test_parse_mapping_editor_output() {
        let mapping = parse_mapping(
            r#"{"image_size": [2480, 3508], "fields": {"Name": {"x": 757, "y": 1205, "w": 1056, "h": 50}}}"#,
        )
        .unwrap();
        assert_eq!(mapping.fields["Name"], FieldBox::new(757, 1205, 1056, 50));
    }

    #[test]
    fn test_parse_mapping_invalid() {
        let err = parse_mapping(r#"{"fields": {"Name": {"x": -4}}}"#).unwrap_err();
        assert!(matches!(err, FormError::ParseError(_)));

        assert!(parse_mapping("not json").is_err());
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(r#"{"text_align": "left"}"#).unwrap();
        assert_eq!(config.text_align, TextAlign::Left);

        let err = parse_config(r#"{"text_align": "justify"}"#).unwrap_err();
        assert!(matches!(err, FormError::ConfigError(_)));

        let err = parse_config(r#"{"font_size": -1}"#).unwrap_err();
        assert!(matches!(err, FormError::ConfigError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_mapping("/nonexistent/mapping.json").unwrap_err();
        assert!(matches!(err, FormError::IoError(_)));
    }

    #[test]
    fn test_load_candidates() {
        let path = std::env::temp_dir().join(format!(
            "form-render-candidates-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"[{"serial": "1", "name": "Anita Kumar", "record": {"Name": "Anita Kumar", "DOB": "2001-04-09"}}]"#,
        )
        .unwrap();

        let candidates = load_candidates(&path).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Anita Kumar");
        assert_eq!(candidates[0].record.len(), 2);
        assert!(candidates[0].photo.is_none());

        std::fs::write(&path, "[{\"serial\": 1}]").unwrap();
        assert!(matches!(load_candidates(&path), Err(FormError::JsonError(_))));
    }

    #[test]
    fn test_load_template_errors() {
        let path = std::env::temp_dir().join(format!(
            "form-render-template-{}.png",
            std::process::id()
        ));
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(load_template(&path), Err(FormError::TemplateError(_))));

        image::RgbImage::new(3, 2).save(&path).unwrap();
        assert_eq!(load_template(&path).unwrap().dimensions(), (3, 2));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("hello")), "hello");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "");
    }
}

use std::path::Path;

use droid_i18n::{TranslationData, formats::SourceFormat};
use tracing::warn;

/// Validate project directory exists
pub fn validate_project_dir(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("Project directory does not exist: {}", path));
    }

    if !path_obj.is_dir() {
        return Err(format!("Project path is not a directory: {}", path));
    }

    Ok(())
}

/// Validate an Android locale qualifier (`en`, `fr-rCA`, `b+es+ES`)
pub fn validate_locale(locale: &str) -> Result<(), String> {
    if locale.trim().is_empty() {
        return Err("Locale cannot be empty".to_string());
    }

    if locale.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(format!("Invalid locale: {}", locale));
    }

    if TranslationData::new(locale, Vec::new())
        .language_identifier()
        .is_none()
    {
        warn!("Locale `{}` is not a recognised language tag", locale);
    }

    Ok(())
}

/// Validate a local spreadsheet file exists and has a supported extension
pub fn validate_source_file(path: &str) -> Result<(), String> {
    SourceFormat::from_path(path).map_err(|e| e.to_string())?;

    let path_obj = Path::new(path);
    if !path_obj.is_file() {
        return Err(format!("File does not exist: {}", path));
    }

    Ok(())
}

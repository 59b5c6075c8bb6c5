use std::path::Path;

use droid_i18n::{
    ImportConfig,
    import::{DEFAULT_LOCALE, DEFAULT_SHEET_NAME_PATTERN},
    import_project,
};
use tracing::info;

use crate::{
    config::Settings,
    validation::{validate_locale, validate_project_dir},
};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub project: String,
    pub source: Option<String>,
    pub default_locale: Option<String>,
    pub all_sheets: bool,
    pub sheet_name_regex: Option<String>,
    pub config: Option<String>,
}

/// Run the import command: write the project's `strings.xml` files from a workbook.
pub fn run_import_command(opts: ImportOptions) -> Result<(), String> {
    validate_project_dir(&opts.project)?;
    let project = Path::new(&opts.project);
    let settings = Settings::load(project, opts.config.as_deref())?;

    let source = opts
        .source
        .clone()
        .or_else(|| settings.source_in(project))
        .unwrap_or_default();
    let default_locale = opts
        .default_locale
        .or(settings.default_locale)
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    validate_locale(&default_locale)?;
    let pattern = opts
        .sheet_name_regex
        .or(settings.import_sheet_name_regex)
        .unwrap_or_else(|| DEFAULT_SHEET_NAME_PATTERN.to_string());

    let config = ImportConfig::new()
        .with_default_locale(default_locale)
        .with_all_sheets(opts.all_sheets || settings.import_all_sheets.unwrap_or(false))
        .with_sheet_name_regex(&pattern)
        .map_err(|e| format!("Invalid sheet name regex '{}': {}", pattern, e))?;

    let written = import_project(project, &source, &config)
        .map_err(|e| format!("Import failed: {}", e))?;
    if !written.is_empty() {
        info!("Imported {} resource files", written.len());
    }
    Ok(())
}

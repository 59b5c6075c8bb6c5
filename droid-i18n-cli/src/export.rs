use std::path::{Path, PathBuf};

use droid_i18n::{ExportConfig, export_project, import::DEFAULT_LOCALE};

use crate::{
    config::Settings,
    validation::{validate_locale, validate_project_dir},
};

/// Default export directory, relative to the project.
pub const DEFAULT_OUTPUT_DIR: &str = "build";

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub project: String,
    pub output_dir: Option<String>,
    pub default_locale: Option<String>,
    pub dedup_source: Option<String>,
    pub config: Option<String>,
}

/// Run the export command: gather the project's `strings.xml` files into a workbook.
///
/// Prints the path of the written workbook.
pub fn run_export_command(opts: ExportOptions) -> Result<(), String> {
    validate_project_dir(&opts.project)?;
    let project = Path::new(&opts.project);
    let settings = Settings::load(project, opts.config.as_deref())?;

    let output_dir: PathBuf = opts
        .output_dir
        .map(PathBuf::from)
        .or_else(|| settings.output_dir_in(project))
        .unwrap_or_else(|| project.join(DEFAULT_OUTPUT_DIR));
    let default_locale = opts
        .default_locale
        .or(settings.default_locale)
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    validate_locale(&default_locale)?;

    let config = ExportConfig::new()
        .with_default_locale(default_locale)
        .with_dedup_source(opts.dedup_source.or(settings.dedup_source));

    let path = export_project(project, &output_dir, &config)
        .map_err(|e| format!("Export failed: {}", e))?;
    println!("{}", path.display());
    Ok(())
}

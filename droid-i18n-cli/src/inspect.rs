use std::fs::File;
use std::io::Write;

use droid_i18n::{
    ImportConfig, ImportStrategy, Importer, SourceLocator, XlsImporter,
    import::{DEFAULT_LOCALE, DEFAULT_SHEET_NAME_PATTERN},
    source::{Connector, FileConnector},
};

use crate::validation::{validate_locale, validate_source_file};

#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    pub source: String,
    pub default_locale: Option<String>,
    pub all_sheets: bool,
    pub sheet_name_regex: Option<String>,
    pub multi_module: bool,
    pub output: Option<String>,
}

/// Run the inspect command: read a workbook and output the imported project as JSON.
///
/// Nothing is written to the project; validation errors are reported as for an import.
pub fn run_inspect_command(opts: InspectOptions) -> Result<(), String> {
    let default_locale = opts
        .default_locale
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    validate_locale(&default_locale)?;
    let pattern = opts
        .sheet_name_regex
        .unwrap_or_else(|| DEFAULT_SHEET_NAME_PATTERN.to_string());
    let config = ImportConfig::new()
        .with_default_locale(default_locale)
        .with_all_sheets(opts.all_sheets)
        .with_sheet_name_regex(&pattern)
        .map_err(|e| format!("Invalid sheet name regex '{}': {}", pattern, e))?;

    let locator = SourceLocator::parse(&opts.source);
    match &locator {
        SourceLocator::Local(_) => validate_source_file(opts.source.trim())?,
        _ => {
            locator.format().map_err(|e| e.to_string())?;
        }
    }
    let reader = FileConnector
        .open(&locator)
        .map_err(|e| format!("Error reading {}: {}", locator, e))?;

    let strategy = if opts.multi_module {
        ImportStrategy::MultiModule
    } else {
        ImportStrategy::SingleModule
    };
    let project = XlsImporter
        .generate(reader, &config, strategy)
        .map_err(|e| format!("Error reading {}: {}", locator, e))?;

    let json = project
        .to_json()
        .map_err(|e| format!("Error serializing to JSON: {}", e))?;

    match opts.output {
        Some(output_path) => {
            File::create(&output_path)
                .and_then(|mut f| f.write_all(json.as_bytes()))
                .map_err(|e| format!("Error writing to {}: {}", output_path, e))?;
            eprintln!("Inspect output written to: {}", output_path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

//! Optional TOML settings shared by the `import` and `export` commands.
//!
//! ```toml
//! source_file = "translations/i18n.xlsx"
//! default_locale = "en"
//! import_all_sheets = true
//! import_sheet_name_regex = "app|features\\..*"
//! output_dir = "build/i18n"
//! dedup_source = "app"
//! ```
//!
//! Relative paths are resolved against the project directory. Command line
//! flags take precedence over these values.

use std::path::{Path, PathBuf};

use droid_i18n::SourceLocator;
use serde::Deserialize;
use tracing::debug;

/// Settings file looked up in the project directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "i18n.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub source_file: Option<String>,
    pub default_locale: Option<String>,
    pub import_all_sheets: Option<bool>,
    pub import_sheet_name_regex: Option<String>,
    pub output_dir: Option<String>,
    pub dedup_source: Option<String>,
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid settings: {}", e))
    }

    /// Reads the settings file at `path`.
    pub fn read_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read settings {}: {}", path.display(), e))?;
        Self::from_toml(&content).map_err(|e| format!("{} in {}", e, path.display()))
    }

    /// Loads `explicit` when given, else `<project>/i18n.toml` when it exists,
    /// else empty settings.
    pub fn load(project: &Path, explicit: Option<&str>) -> Result<Self, String> {
        if let Some(path) = explicit {
            return Self::read_from(Path::new(path));
        }
        let default_path = project.join(DEFAULT_SETTINGS_FILE);
        if default_path.is_file() {
            debug!("Using settings {}", default_path.display());
            Self::read_from(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Source from the settings, a relative local path being anchored at `project`.
    pub fn source_in(&self, project: &Path) -> Option<String> {
        let source = self.source_file.as_deref()?;
        match SourceLocator::parse(source) {
            SourceLocator::Local(path) if path.is_relative() && !source.trim().is_empty() => {
                Some(project.join(path).to_string_lossy().into_owned())
            }
            _ => Some(source.to_string()),
        }
    }

    /// Output directory from the settings, anchored at `project`.
    pub fn output_dir_in(&self, project: &Path) -> Option<PathBuf> {
        self.output_dir.as_deref().map(|dir| project.join(dir))
    }
}

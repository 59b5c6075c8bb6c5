//! Export: `strings.xml` files → translation workbook.
//!
//! Every leaf module contributes one sheet built from its
//! `src/main/res/values[-<locale>]/*strings.xml` files. The workbook is written
//! as `i18n_<timestamp>.xlsx` after earlier exports are removed from the
//! output directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    formats::{
        android_strings::Format as AndroidStringsFormat,
        sheet::Workbook,
        xlsx::write_workbook_to,
    },
    import::DEFAULT_LOCALE,
    mapper::module_to_sheet,
    project::ProjectLayout,
    traits::Parser,
    types::{ModuleData, ProjectData, TranslationData},
};

/// `chrono` pattern of the timestamp in export file names.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const STRINGS_FILE_SUFFIX: &str = "strings.xml";

lazy_static! {
    static ref VALUES_DIR: Regex = Regex::new(r"^values(-(.*))?$").unwrap();
    static ref EXPORT_FILE: Regex = Regex::new(r"^i18n_.*\.xlsx$").unwrap();
}

/// Options driving an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Locale of the unsuffixed `values` directory.
    pub default_locale: String,
    /// Module whose labels override the same labels of every other module.
    pub dedup_source: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            dedup_source: None,
        }
    }
}

impl ExportConfig {
    /// Creates default export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default locale.
    pub fn with_default_locale(mut self, default_locale: impl Into<String>) -> Self {
        self.default_locale = default_locale.into();
        self
    }

    /// Sets the module deduplicated against the others.
    pub fn with_dedup_source(mut self, dedup_source: Option<String>) -> Self {
        self.dedup_source = dedup_source;
        self
    }
}

/// Reads the translations of one resource directory, in directory name order.
///
/// `values` holds the default locale and `values-<locale>` the others. A
/// directory without a `*strings.xml` file contributes nothing; so does a
/// missing resource directory.
pub fn load_translations(
    res_dir: &Path,
    default_locale: &str,
) -> Result<Vec<TranslationData>, Error> {
    if !res_dir.is_dir() {
        debug!("No resource directory at {}", res_dir.display());
        return Ok(Vec::new());
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(res_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut translations = Vec::new();
    for dir in dirs {
        let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(captures) = VALUES_DIR.captures(dir_name) else {
            continue;
        };
        let suffix = captures
            .get(2)
            .map(|m| m.as_str())
            .filter(|s| !s.trim().is_empty());
        let Some(file) = strings_file(&dir)? else {
            continue;
        };

        let mut format = AndroidStringsFormat::read_from(&file)?;
        format.locale = suffix.unwrap_or(default_locale).to_string();
        format.default_locale = suffix.is_none();
        debug!(
            "Read {} ({} strings, {} plurals)",
            file.display(),
            format.strings.len(),
            format.plurals.len()
        );
        translations.push(TranslationData::from(format));
    }
    Ok(translations)
}

fn strings_file(dir: &Path) -> Result<Option<PathBuf>, Error> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(STRINGS_FILE_SUFFIX))
        })
        .collect();
    files.sort();
    Ok(files.into_iter().next())
}

/// Loads every leaf module holding at least one label.
///
/// The project is deduplicated against [`ExportConfig::dedup_source`] when set.
pub fn load_project(layout: &ProjectLayout, config: &ExportConfig) -> Result<ProjectData, Error> {
    let mut modules = Vec::new();
    for leaf in layout.leaves() {
        let translations = load_translations(&leaf.res_dir(), &config.default_locale)?;
        let module = ModuleData::new(leaf.name(), translations);
        if module.is_empty() {
            warn!("Module {} has no strings, skipping it", leaf.path);
            continue;
        }
        modules.push(module);
    }

    let project = ProjectData::new(modules);
    match &config.dedup_source {
        Some(source) => {
            if project.module(source).is_none() {
                warn!("Deduplication source `{}` is not an exported module", source);
            }
            Ok(project.deduplicated(source))
        }
        None => Ok(project),
    }
}

/// One sheet per module, in module order.
pub fn project_to_workbook(project: &ProjectData) -> Workbook {
    Workbook::new(project.modules.iter().map(module_to_sheet).collect())
}

/// `i18n_2024-01-31_13-45-00.xlsx` for the given time.
pub fn export_file_name(time: &DateTime<Local>) -> String {
    format!("i18n_{}.xlsx", time.format(EXPORT_TIMESTAMP_FORMAT))
}

/// Removes earlier `i18n_*.xlsx` exports from `output_dir`, returning how many were removed.
pub fn remove_previous_exports(output_dir: &Path) -> Result<usize, Error> {
    if !output_dir.is_dir() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        let is_export = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| EXPORT_FILE.is_match(n));
        if is_export && path.is_file() {
            fs::remove_file(&path)?;
            debug!("Removed previous export {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}

/// Exports the project at `project_dir` into a new workbook in `output_dir`.
///
/// Returns the path of the written workbook.
pub fn export_project<P: AsRef<Path>, O: AsRef<Path>>(
    project_dir: P,
    output_dir: O,
    config: &ExportConfig,
) -> Result<PathBuf, Error> {
    let layout = ProjectLayout::discover(project_dir)?;
    let project = load_project(&layout, config)?;
    if project.modules.is_empty() {
        warn!("No strings found under {}", layout.root.display());
    }

    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    remove_previous_exports(output_dir)?;

    let path = output_dir.join(export_file_name(&Local::now()));
    write_workbook_to(&project_to_workbook(&project), &path)?;
    info!(
        "Exported {} modules to {}",
        project.modules.len(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StringData;
    use chrono::TimeZone;
    use indoc::indoc;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_translations() {
        let dir = TempDir::new().unwrap();
        let res = dir.path().join("src/main/res");
        write(
            &res.join("values/strings.xml"),
            indoc! {r#"
                <resources>
                    <string name="b">B</string>
                    <string name="a">l\'avion</string>
                    <plurals name="days">
                        <item quantity="one">%d day</item>
                        <item quantity="other">%d days</item>
                    </plurals>
                </resources>
            "#},
        );
        write(
            &res.join("values-fr/app_strings.xml"),
            r#"<resources><string name="a">l\'avion</string></resources>"#,
        );
        write(&res.join("values-night/colors.xml"), "<resources/>");
        fs::create_dir_all(res.join("drawable")).unwrap();

        let translations = load_translations(&res, "en").unwrap();
        assert_eq!(translations.len(), 2);

        let en = &translations[0];
        assert_eq!(en.locale, "en");
        assert!(en.default_locale);
        assert_eq!(
            en.strings,
            vec![
                StringData::new("a", "l\\'avion"),
                StringData::new("b", "B"),
                StringData::new("days:one", "%d day"),
                StringData::new("days:other", "%d days"),
            ]
        );

        let fr = &translations[1];
        assert_eq!(fr.locale, "fr");
        assert!(!fr.default_locale);
    }

    #[test]
    fn test_load_translations_keeps_markup_and_whitespace() {
        let dir = TempDir::new().unwrap();
        let res = dir.path().join("src/main/res");
        write(
            &res.join("values/strings.xml"),
            indoc! {r#"
                <resources>
                    <string name="bold">Hello <b>World</b>!</string>
                    <string name="entity">Fish &amp; chips</string>
                    <string name="total">Total: </string>
                </resources>
            "#},
        );

        let translations = load_translations(&res, "en").unwrap();
        assert_eq!(
            translations[0].strings,
            vec![
                StringData::new("bold", "Hello <b>World</b>!"),
                StringData::new("entity", "Fish & chips"),
                StringData::new("total", "Total: "),
            ]
        );

        let sheet = module_to_sheet(&ModuleData::new("app", translations));
        assert_eq!(sheet.cell(1, 1), Some("Hello <b>World</b>!"));
        assert_eq!(sheet.cell(3, 1), Some("Total: "));
    }

    #[test]
    fn test_load_translations_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(load_translations(&dir.path().join("nope"), "en").unwrap().is_empty());
    }

    #[test]
    fn test_load_project_skips_empty_modules_and_dedups() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(&root.join("build.gradle"), "");
        write(
            &root.join("app/src/main/res/values/strings.xml"),
            r#"<resources><string name="key1">overridden</string></resources>"#,
        );
        write(
            &root.join("feature/src/main/res/values/strings.xml"),
            r#"<resources><string name="key1">base</string><string name="key2">v2</string></resources>"#,
        );
        write(&root.join("empty/build.gradle"), "");

        let layout = ProjectLayout::discover(root).unwrap();
        let plain = load_project(&layout, &ExportConfig::new()).unwrap();
        let names: Vec<_> = plain.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["app", "feature"]);

        let config = ExportConfig::new().with_dedup_source(Some("app".to_string()));
        let deduplicated = load_project(&layout, &config).unwrap();
        assert!(deduplicated.module("app").unwrap().is_empty());
        let feature = deduplicated.module("feature").unwrap().translation("en").unwrap();
        assert_eq!(feature.find("key1").unwrap().text, "overridden");
        assert_eq!(feature.find("key2").unwrap().text, "v2");
    }

    #[test]
    fn test_export_file_name() {
        let time = Local.with_ymd_and_hms(2024, 1, 31, 13, 45, 7).unwrap();
        assert_eq!(export_file_name(&time), "i18n_2024-01-31_13-45-07.xlsx");
    }

    #[test]
    fn test_remove_previous_exports() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("i18n_2023-01-01_00-00-00.xlsx"), "").unwrap();
        fs::write(dir.path().join("i18n_old.xlsx"), "").unwrap();
        fs::write(dir.path().join("report.xlsx"), "").unwrap();
        fs::write(dir.path().join("i18n_notes.txt"), "").unwrap();

        assert_eq!(remove_previous_exports(dir.path()).unwrap(), 2);
        let mut left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["i18n_notes.txt", "report.xlsx"]);
    }

    #[test]
    fn test_project_to_workbook() {
        let project = ProjectData::new(vec![ModuleData::new(
            "app",
            vec![TranslationData::new("en", vec![StringData::new("k", "v")]).with_default_locale(true)],
        )]);
        let workbook = project_to_workbook(&project);
        assert_eq!(workbook.sheet_names(), vec!["app"]);
        assert_eq!(workbook.sheets[0].cell(1, 1), Some("v"));
    }
}

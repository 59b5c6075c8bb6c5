//! Import: translation workbook → `strings.xml` files.
//!
//! The workbook is mapped into a [`ProjectData`] by an [`Importer`], then every
//! `(module, locale)` pair is written to
//! `<res dir>/values[-<locale>]/<strings file name>`. Output files are
//! overwritten, so importing the same workbook twice yields identical files.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    formats::{
        android_strings::Format as AndroidStringsFormat,
        sheet::Workbook,
        xlsx::read_workbook,
    },
    mapper::{ModuleBuilder, sheet_to_module},
    project::ProjectLayout,
    source::{Connector, FileConnector, SourceLocator},
    traits::{ImportStrategy, Importer, Parser},
    types::{ModuleData, ProjectData, TranslationData},
};

/// Locale used for the unsuffixed `values` directory unless configured otherwise.
pub const DEFAULT_LOCALE: &str = "en";

/// Sheet name filter matching every sheet.
pub const DEFAULT_SHEET_NAME_PATTERN: &str = ".*";

/// File name of the resources of a single-module import.
pub const STRINGS_FILE_NAME: &str = "strings.xml";

lazy_static! {
    static ref MATCH_ALL: Regex = full_match(DEFAULT_SHEET_NAME_PATTERN).unwrap();
}

fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Options driving an import.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Locale written to the unsuffixed `values` directory.
    pub default_locale: String,
    /// Single-module imports merge the rows of every matching sheet when set.
    pub all_sheets: bool,
    sheet_name_regex: Regex,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            all_sheets: false,
            sheet_name_regex: MATCH_ALL.clone(),
        }
    }
}

impl ImportConfig {
    /// Creates default import options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default locale.
    pub fn with_default_locale(mut self, default_locale: impl Into<String>) -> Self {
        self.default_locale = default_locale.into();
        self
    }

    /// Enables/disables reading every matching sheet.
    pub fn with_all_sheets(mut self, all_sheets: bool) -> Self {
        self.all_sheets = all_sheets;
        self
    }

    /// Sets the sheet name filter. The pattern must match the whole name.
    pub fn with_sheet_name_regex(mut self, pattern: &str) -> Result<Self, Error> {
        self.sheet_name_regex = full_match(pattern)?;
        Ok(self)
    }

    /// The first sheet is always read; the others only when their name matches.
    pub fn includes_sheet(&self, index: usize, name: &str) -> bool {
        index == 0 || self.sheet_name_regex.is_match(name)
    }
}

/// Importer of `.xls` and `.xlsx` workbooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsImporter;

impl Importer for XlsImporter {
    fn generate<R: Read>(
        &self,
        reader: R,
        config: &ImportConfig,
        strategy: ImportStrategy,
    ) -> Result<ProjectData, Error> {
        let workbook = read_workbook(reader)?;
        workbook_to_project(&workbook, config, strategy)
    }
}

/// Maps the sheets of a workbook to modules.
///
/// Single-module: the first sheet, plus every matching sheet when
/// [`ImportConfig::all_sheets`] is set, merged into one module; the header is
/// read from the first sheet only. Multi-module: every matching sheet becomes
/// the module named after it, with its own header.
pub fn workbook_to_project(
    workbook: &Workbook,
    config: &ImportConfig,
    strategy: ImportStrategy,
) -> Result<ProjectData, Error> {
    match strategy {
        ImportStrategy::SingleModule => {
            let mut builder = ModuleBuilder::new(config.default_locale.as_str());
            for (index, sheet) in workbook.sheets.iter().enumerate() {
                if index > 0 && !(config.all_sheets && config.includes_sheet(index, &sheet.name)) {
                    debug!("Skipping sheet `{}`", sheet.name);
                    continue;
                }
                if !builder.has_header() {
                    builder.read_header(sheet);
                }
                builder.read_rows(sheet, 1)?;
            }
            Ok(ProjectData::new(vec![builder.build(ModuleData::DEFAULT_NAME)]))
        }
        ImportStrategy::MultiModule => {
            let mut modules = Vec::new();
            for (index, sheet) in workbook.sheets.iter().enumerate() {
                if !config.includes_sheet(index, &sheet.name) {
                    debug!("Skipping sheet `{}`", sheet.name);
                    continue;
                }
                if sheet.is_empty() {
                    warn!("Sheet `{}` is empty, no module written for it", sheet.name);
                    continue;
                }
                modules.push(sheet_to_module(sheet, sheet.name.as_str(), &config.default_locale)?);
            }
            Ok(ProjectData::new(modules))
        }
    }
}

/// One `strings.xml` file to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: PathBuf,
    pub resources: AndroidStringsFormat,
}

/// `values` for the default locale, `values-<locale>` otherwise.
pub fn values_dir_name(translation: &TranslationData) -> String {
    if translation.default_locale {
        "values".to_string()
    } else {
        format!("values-{}", translation.locale)
    }
}

/// `features.feature-one` → `feature_one_strings.xml`.
pub fn strings_file_name(module_name: &str) -> String {
    let inner = module_name
        .split_once('.')
        .map(|(_, inner)| inner)
        .unwrap_or(module_name);
    format!("{}_strings.xml", inner.replace('-', "_"))
}

/// Lays out one resource file per `(module, locale)` pair.
pub fn resource_files(
    project: &ProjectData,
    layout: &ProjectLayout,
    strategy: ImportStrategy,
) -> Vec<ResourceFile> {
    project
        .modules
        .iter()
        .flat_map(|module| {
            let (res_dir, file_name) = match strategy {
                ImportStrategy::SingleModule => {
                    (layout.single_module_res_dir(), STRINGS_FILE_NAME.to_string())
                }
                ImportStrategy::MultiModule => {
                    (layout.module_res_dir(&module.name), strings_file_name(&module.name))
                }
            };
            module.translations.iter().map(move |translation| ResourceFile {
                path: res_dir.join(values_dir_name(translation)).join(&file_name),
                resources: AndroidStringsFormat::from(translation),
            })
        })
        .collect()
}

/// Writes every resource file, creating parent directories as needed.
pub fn write_resource_files(files: &[ResourceFile]) -> Result<(), Error> {
    for file in files {
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)?;
        }
        file.resources.write_to(&file.path)?;
        info!("Wrote {}", file.path.display());
    }
    Ok(())
}

/// Imports `source` into the project at `project_dir` reading local files.
///
/// Returns the written files. A blank `source` is a no-op.
pub fn import_project<P: AsRef<Path>>(
    project_dir: P,
    source: &str,
    config: &ImportConfig,
) -> Result<Vec<PathBuf>, Error> {
    import_project_with(&FileConnector, project_dir, source, config)
}

/// Imports `source` opening it through `connector`.
pub fn import_project_with<C: Connector, P: AsRef<Path>>(
    connector: &C,
    project_dir: P,
    source: &str,
    config: &ImportConfig,
) -> Result<Vec<PathBuf>, Error> {
    if source.trim().is_empty() {
        warn!("No translation source configured, nothing to import");
        return Ok(Vec::new());
    }

    let locator = SourceLocator::parse(source);
    locator.format()?;

    let layout = ProjectLayout::discover(project_dir)?;
    let strategy = layout.strategy();
    info!("Importing {} ({:?})", locator, strategy);

    let reader = connector.open(&locator)?;
    let project = XlsImporter.generate(reader, config, strategy)?;

    let files = resource_files(&project, &layout, strategy);
    write_resource_files(&files)?;
    Ok(files.into_iter().map(|f| f.path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formats::sheet::Sheet, types::StringData};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn workbook() -> Workbook {
        Workbook::new(vec![
            Sheet::from_text_rows("app", [["key", "en", "fr"], ["name1", "Value 1", "Valeur 1"]]),
            Sheet::from_text_rows("features.feature-one", [["key", "en"], ["title", "Title"]]),
            Sheet::from_text_rows("notes", [["key", "en"], ["note", "Note"]]),
        ])
    }

    #[test]
    fn test_config_defaults() {
        let config = ImportConfig::new();
        assert_eq!(config.default_locale, "en");
        assert!(!config.all_sheets);
        assert!(config.includes_sheet(3, "anything"));
    }

    #[test]
    fn test_sheet_name_regex_is_full_match() {
        let config = ImportConfig::new().with_sheet_name_regex("app|features\\..*").unwrap();
        assert!(config.includes_sheet(0, "notes"));
        assert!(config.includes_sheet(1, "app"));
        assert!(config.includes_sheet(2, "features.feature-one"));
        assert!(!config.includes_sheet(3, "my-app"));
        assert!(!config.includes_sheet(3, "notes"));
    }

    #[test]
    fn test_invalid_sheet_name_regex() {
        let err = ImportConfig::new().with_sheet_name_regex("(").unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn test_single_module_reads_first_sheet_only() {
        let project =
            workbook_to_project(&workbook(), &ImportConfig::new(), ImportStrategy::SingleModule).unwrap();
        assert_eq!(project.modules.len(), 1);
        let module = &project.modules[0];
        assert_eq!(module.name, ModuleData::DEFAULT_NAME);
        assert_eq!(
            module.translation("en").unwrap().strings,
            vec![StringData::new("name1", "Value 1")]
        );
    }

    #[test]
    fn test_single_module_merges_matching_sheets() {
        let config = ImportConfig::new()
            .with_all_sheets(true)
            .with_sheet_name_regex("features\\..*")
            .unwrap();
        let project = workbook_to_project(&workbook(), &config, ImportStrategy::SingleModule).unwrap();
        let en = project.modules[0].translation("en").unwrap();
        let keys: Vec<_> = en.strings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(keys, vec!["name1", "title"]);
        // `fr` comes from the first header; the merged sheet has no such column.
        assert_eq!(project.modules[0].translation("fr").unwrap().find("title").unwrap().text, "");
    }

    #[test]
    fn test_multi_module_maps_sheets_to_modules() {
        let config = ImportConfig::new().with_sheet_name_regex("features\\..*").unwrap();
        let project = workbook_to_project(&workbook(), &config, ImportStrategy::MultiModule).unwrap();
        let names: Vec<_> = project.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["app", "features.feature-one"]);
    }

    #[test]
    fn test_multi_module_skips_empty_sheets() {
        let workbook = Workbook::new(vec![
            Sheet::from_text_rows("app", [["key", "en"], ["name1", "Value 1"]]),
            Sheet::new("scratch", Vec::new()),
        ]);
        let project =
            workbook_to_project(&workbook, &ImportConfig::new(), ImportStrategy::MultiModule).unwrap();
        let names: Vec<_> = project.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["app"]);
    }

    #[test]
    fn test_strings_file_name() {
        assert_eq!(strings_file_name("features.feature-one"), "feature_one_strings.xml");
        assert_eq!(strings_file_name("app"), "app_strings.xml");
        assert_eq!(strings_file_name("a.b-c"), "b_c_strings.xml");
    }

    #[test]
    fn test_values_dir_name() {
        let en = TranslationData::new("en", vec![]).with_default_locale(true);
        let fr = TranslationData::new("b+fr+CA", vec![]);
        assert_eq!(values_dir_name(&en), "values");
        assert_eq!(values_dir_name(&fr), "values-b+fr+CA");
    }

    #[test]
    fn test_resource_files_multi_module_layout() {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::discover(dir.path()).unwrap();
        let project =
            workbook_to_project(&workbook(), &ImportConfig::new(), ImportStrategy::MultiModule).unwrap();

        let paths: Vec<_> = resource_files(&project, &layout, ImportStrategy::MultiModule)
            .into_iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert!(paths.contains(&PathBuf::from("app/src/main/res/values/app_strings.xml")));
        assert!(paths.contains(&PathBuf::from("app/src/main/res/values-fr/app_strings.xml")));
        assert!(paths.contains(&PathBuf::from(
            "features/feature-one/src/main/res/values/feature_one_strings.xml"
        )));
        assert!(paths.contains(&PathBuf::from("notes/src/main/res/values/notes_strings.xml")));
    }

    #[test]
    fn test_blank_source_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let written = import_project(dir.path(), "  ", &ImportConfig::new()).unwrap();
        assert!(written.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unsupported_source_type_fails_before_reading() {
        let dir = TempDir::new().unwrap();
        let err = import_project(dir.path(), "missing.csv", &ImportConfig::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("missing.xlsx");
        let err = import_project(dir.path(), &source.to_string_lossy(), &ImportConfig::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_generate_rejects_corrupt_workbook() {
        let result = XlsImporter.generate(
            Cursor::new(b"not a workbook".to_vec()),
            &ImportConfig::new(),
            ImportStrategy::SingleModule,
        );
        assert!(matches!(result, Err(Error::SpreadsheetRead(_))));
    }
}

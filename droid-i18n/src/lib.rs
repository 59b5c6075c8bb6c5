#![forbid(unsafe_code)]
//! Spreadsheet ⇄ Android `strings.xml` translation converter.
//!
//! Translations live in a workbook with one row per key and one column per
//! locale; plural items use `name:quantity` keys. Importing writes one
//! `strings.xml` per module and locale, exporting gathers them back into a
//! workbook with one sheet per module.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use droid_i18n::{ExportConfig, ImportConfig, export_project, import_project};
//!
//! // Workbook → res/values*/strings.xml
//! import_project("my-android-app", "translations/i18n.xlsx", &ImportConfig::new())?;
//!
//! // res/values*/strings.xml → build/i18n_<timestamp>.xlsx
//! let workbook = export_project("my-android-app", "my-android-app/build", &ExportConfig::new())?;
//! println!("exported to {}", workbook.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Sheet layout
//!
//! | key            | en            | fr             |
//! |----------------|---------------|----------------|
//! | name1          | Value 1       | Valeur 1       |
//! | plurals1:one   | %s singular 1 | %s singulier 1 |
//! | plurals1:other | %s plural 1   | %s pluriel 1   |
//!
//! Apostrophes are escaped and `#` placeholders become `%s` (or `%1$s`,
//! `%2$s`, ... when there are several) on import.

pub mod codec;
pub mod error;
pub mod export;
pub mod formats;
pub mod import;
pub mod mapper;
pub mod project;
pub mod source;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::{Error, Location},
    export::{ExportConfig, export_project},
    formats::SourceFormat,
    import::{ImportConfig, XlsImporter, import_project},
    project::ProjectLayout,
    source::SourceLocator,
    traits::{ImportStrategy, Importer, Parser},
    types::{ModuleData, ProjectData, StringData, TranslationData},
};

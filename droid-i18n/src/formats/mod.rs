//! File formats read and written by droid-i18n.
//!
//! - [`android_strings`]: per-locale `strings.xml` resource files.
//! - [`sheet`]: the in-memory tabular view of a workbook.
//! - [`xlsx`]: reading `.xls`/`.xlsx` workbooks and writing `.xlsx` exports.
//!
//! [`SourceFormat`] tells the supported spreadsheet sources apart by extension.

pub mod android_strings;
pub mod sheet;
pub mod xlsx;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use android_strings::Format as AndroidStringsFormat;
pub use sheet::{Sheet, Workbook};

use crate::Error;

/// Spreadsheet formats accepted as translation sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Legacy binary Excel workbook.
    Xls,
    /// Office Open XML workbook.
    Xlsx,
}

impl Display for SourceFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Accepts `xls` and `xlsx`, case-insensitively, with or without a leading dot.
///
/// # Example
/// ```rust
/// use droid_i18n::formats::SourceFormat;
/// use std::str::FromStr;
/// assert_eq!(SourceFormat::from_str("XLSX").unwrap(), SourceFormat::Xlsx);
/// assert_eq!(SourceFormat::from_str(".xls").unwrap(), SourceFormat::Xls);
/// assert!(SourceFormat::from_str("csv").is_err());
/// ```
impl FromStr for SourceFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match s.as_str() {
            "xls" => Ok(SourceFormat::Xls),
            "xlsx" => Ok(SourceFormat::Xlsx),
            other => Err(Error::UnsupportedFileType(other.to_string())),
        }
    }
}

impl SourceFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Xls => "xls",
            SourceFormat::Xlsx => "xlsx",
        }
    }

    /// Infers the format from the extension of a path or URL.
    ///
    /// Fails with [`Error::UnsupportedFileType`] naming the whole source when the
    /// extension is missing or unknown. Nothing is opened.
    pub fn from_path(source: &str) -> Result<Self, Error> {
        Path::new(source)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| Error::UnsupportedFileType(source.to_string()))
    }
}

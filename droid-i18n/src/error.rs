//! All error types for the droid-i18n crate.
//!
//! These are returned from all fallible operations (spreadsheet reading, resource
//! parsing and writing, validation of translation keys, etc.).

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Position of a spreadsheet row, used to point users at the offending cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Name of the sheet the row belongs to.
    pub sheet: String,
    /// Zero-based row index.
    pub row: usize,
}

impl Location {
    pub fn new(sheet: impl Into<String>, row: usize) -> Self {
        Self {
            sheet: sheet.into(),
            row,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "at row {} in sheet `{}`", self.row + 1, self.sheet)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error("source file `{0}` is not supported")]
    UnsupportedFileType(String),

    #[error("unsupported source `{0}`: no connector available for this scheme")]
    UnsupportedSource(String),

    #[error("invalid translation key `{key}` {location}")]
    InvalidKey { key: String, location: Location },

    #[error("duplicated key `{key}` {location}")]
    DuplicateKey { key: String, location: Location },

    #[error("malformed plural key `{key}` {location}")]
    MalformedPluralKey { key: String, location: Location },

    #[error("value `{value}` in column {column} has no locale header {location}")]
    UnknownLocale {
        value: String,
        column: usize,
        location: Location,
    },

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    #[error("spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an invalid key error for the given row.
    pub fn invalid_key(key: Option<&str>, location: Location) -> Self {
        Error::InvalidKey {
            key: key.unwrap_or_default().to_string(),
            location,
        }
    }

    /// Creates a duplicated key error for the given row.
    pub fn duplicate_key(key: impl Into<String>, location: Location) -> Self {
        Error::DuplicateKey {
            key: key.into(),
            location,
        }
    }

    /// Creates a malformed plural key error for the given row.
    pub fn malformed_plural_key(key: impl Into<String>, location: Location) -> Self {
        Error::MalformedPluralKey {
            key: key.into(),
            location,
        }
    }

    /// Returns the spreadsheet location attached to row-level validation errors.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::InvalidKey { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::MalformedPluralKey { location, .. }
            | Error::UnknownLocale { location, .. } => Some(location),
            _ => None,
        }
    }
}

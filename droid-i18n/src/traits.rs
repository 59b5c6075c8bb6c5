//! Traits for reading and writing translation sources and resource files.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::{error::Error, import::ImportConfig, types::ProjectData};

/// A trait for parsing and writing a resource from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use droid_i18n::traits::Parser;
/// let format = droid_i18n::formats::android_strings::Format::read_from("values/strings.xml")?;
/// format.write_to("values-fr/strings.xml")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.to_writer(writer)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }
}

/// How the sheets of a translation source are turned into modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStrategy {
    /// Every row ends up in one module named [`crate::types::ModuleData::DEFAULT_NAME`].
    SingleModule,
    /// Each sheet becomes the module named after it.
    MultiModule,
}

/// Builds a [`ProjectData`] from a translation source stream.
///
/// One implementation exists per source format; [`crate::import::XlsImporter`]
/// handles `.xls` and `.xlsx` workbooks.
pub trait Importer {
    fn generate<R: Read>(
        &self,
        reader: R,
        config: &ImportConfig,
        strategy: ImportStrategy,
    ) -> Result<ProjectData, Error>;
}

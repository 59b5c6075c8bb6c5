//! Mapping between spreadsheet [`Sheet`]s and [`ModuleData`].
//!
//! Importing validates every row: keys must be legal, unique within the
//! module, plural keys must split into a name and a quantity, and values may
//! only appear under a locale header. Values are cleaned up with
//! [`clean_up_translated_text`] on the way in; exporting reverts the quote
//! escaping so that a re-import escapes exactly once.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    codec::{
        Key, clean_up_translated_text, is_blank, is_empty_row, is_invalid_key, parse_key,
        unescape_quotes,
    },
    error::{Error, Location},
    formats::{sheet::Sheet, xlsx::sheet_name},
    types::{ModuleData, StringData, TranslationData},
};

/// Label of the key column in exported header rows.
pub const KEY_HEADER: &str = "key";

/// Accumulates the validated rows of one module, possibly across several sheets.
///
/// The locale columns are taken from the header of the first sheet passed to
/// [`ModuleBuilder::read_header`] and reused for every following sheet.
#[derive(Debug)]
pub struct ModuleBuilder {
    default_locale: String,
    header_read: bool,
    columns: Vec<(usize, String)>,
    ignored_columns: Vec<usize>,
    seen_keys: HashSet<String>,
    translations: Vec<TranslationData>,
}

impl ModuleBuilder {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            header_read: false,
            columns: Vec::new(),
            ignored_columns: Vec::new(),
            seen_keys: HashSet::new(),
            translations: Vec::new(),
        }
    }

    /// Whether a header has been registered yet.
    pub fn has_header(&self) -> bool {
        self.header_read
    }

    /// Registers one locale per non-blank header cell after the key column.
    pub fn read_header(&mut self, sheet: &Sheet) {
        self.header_read = true;
        let Some(header) = sheet.rows.first() else {
            warn!("Sheet `{}` has no header row", sheet.name);
            return;
        };

        for (column, cell) in header.iter().enumerate().skip(1) {
            let Some(locale) = cell.as_deref().map(str::trim).filter(|l| !l.is_empty()) else {
                continue;
            };
            if self.translations.iter().any(|t| t.locale == locale) {
                warn!(
                    "Locale `{}` is declared twice in sheet `{}`, column {} is ignored",
                    locale,
                    sheet.name,
                    column + 1
                );
                self.ignored_columns.push(column);
                continue;
            }

            let translation = TranslationData::new(locale, Vec::new())
                .with_default_locale(locale == self.default_locale);
            if translation.language_identifier().is_none() {
                warn!(
                    "Locale `{}` in sheet `{}` is not a recognised language tag",
                    locale, sheet.name
                );
            }
            self.columns.push((column, locale.to_string()));
            self.translations.push(translation);
        }

        if !self.translations.iter().any(|t| t.default_locale) {
            warn!(
                "Default locale `{}` has no column in sheet `{}`",
                self.default_locale, sheet.name
            );
        }
        debug!("Sheet `{}` declares locales {:?}", sheet.name, self.locales());
    }

    /// Reads every row of `sheet` from `first_row` on.
    pub fn read_rows(&mut self, sheet: &Sheet, first_row: usize) -> Result<(), Error> {
        for row in first_row..sheet.rows.len() {
            self.read_row(sheet, row)?;
        }
        Ok(())
    }

    fn read_row(&mut self, sheet: &Sheet, row: usize) -> Result<(), Error> {
        let raw_key = sheet.cell(row, 0);
        if is_empty_row(raw_key, self.columns.iter().map(|(col, _)| sheet.cell(row, *col))) {
            debug!("Skipping empty row {} of sheet `{}`", row + 1, sheet.name);
            return Ok(());
        }

        let location = Location::new(sheet.name.as_str(), row);
        if is_invalid_key(raw_key) {
            return Err(Error::invalid_key(raw_key, location));
        }
        let key = raw_key.map(str::trim).unwrap_or_default();
        if parse_key(key).is_none() {
            return Err(Error::malformed_plural_key(key, location));
        }
        if !self.seen_keys.insert(key.to_string()) {
            return Err(Error::duplicate_key(key, location));
        }

        if let Some(cells) = sheet.rows.get(row) {
            for (column, cell) in cells.iter().enumerate().skip(1) {
                let registered = self.columns.iter().any(|(col, _)| *col == column)
                    || self.ignored_columns.contains(&column);
                if !registered && !is_blank(cell.as_deref()) {
                    return Err(Error::UnknownLocale {
                        value: cell.clone().unwrap_or_default(),
                        column: column + 1,
                        location,
                    });
                }
            }
        }

        for ((column, _), translation) in self.columns.iter().zip(self.translations.iter_mut()) {
            let text = sheet.cell(row, *column).unwrap_or_default();
            translation
                .strings
                .push(StringData::new(key, clean_up_translated_text(text)));
        }
        Ok(())
    }

    /// Locales registered so far, in header order.
    pub fn locales(&self) -> Vec<&str> {
        self.translations.iter().map(|t| t.locale.as_str()).collect()
    }

    /// Finishes the module. Every locale holds its singular strings sorted by
    /// name, followed by its plural items grouped by plural name.
    pub fn build(self, name: impl Into<String>) -> ModuleData {
        let translations = self
            .translations
            .into_iter()
            .map(|translation| TranslationData {
                strings: sorted_strings(translation.strings),
                ..translation
            })
            .collect();
        ModuleData::new(name, translations)
    }
}

fn sorted_strings(strings: Vec<StringData>) -> Vec<StringData> {
    let (mut plurals, mut singulars): (Vec<StringData>, Vec<StringData>) = strings
        .into_iter()
        .partition(|s| matches!(parse_key(&s.name), Some(Key::Plural { .. })));
    singulars.sort_by(|a, b| a.name.cmp(&b.name));
    // Stable sort: items of one plural group keep their sheet order.
    plurals.sort_by(|a, b| plural_name(&a.name).cmp(plural_name(&b.name)));
    singulars.extend(plurals);
    singulars
}

fn plural_name(key: &str) -> &str {
    match parse_key(key) {
        Some(Key::Plural { name, .. }) => name,
        _ => key,
    }
}

/// Maps a single sheet, header included, to a module.
pub fn sheet_to_module(
    sheet: &Sheet,
    name: impl Into<String>,
    default_locale: &str,
) -> Result<ModuleData, Error> {
    let mut builder = ModuleBuilder::new(default_locale);
    builder.read_header(sheet);
    builder.read_rows(sheet, 1)?;
    Ok(builder.build(name))
}

/// Maps a module back to a sheet named after it.
///
/// The header is `key` followed by one column per translation, in order. Rows
/// follow the keys of the first translation; missing values are written as
/// empty strings.
pub fn module_to_sheet(module: &ModuleData) -> Sheet {
    let mut header = vec![Some(KEY_HEADER.to_string())];
    header.extend(module.translations.iter().map(|t| Some(t.locale.clone())));
    let mut rows = vec![header];

    if let Some(reference) = module.translations.first() {
        for other in module.translations.iter().skip(1) {
            for string in other.strings.iter().filter(|s| reference.find(&s.name).is_none()) {
                warn!(
                    "Key `{}` of locale `{}` in module `{}` is missing from locale `{}` and is not exported",
                    string.name, other.locale, module.name, reference.locale
                );
            }
        }

        for string in &reference.strings {
            let mut row = vec![Some(string.name.clone())];
            row.extend(module.translations.iter().map(|translation| {
                let text = translation
                    .find(&string.name)
                    .map(|s| unescape_quotes(&s.text))
                    .unwrap_or_default();
                Some(text)
            }));
            rows.push(row);
        }
    }

    Sheet::new(sheet_name(&module.name), rows)
}

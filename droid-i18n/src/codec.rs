//! Text and key transforms applied to every translation cell.
//!
//! Values coming from a spreadsheet are "cleaned up" before landing in a
//! `strings.xml` file: apostrophes are escaped and `#` placeholders become
//! Android format arguments. Keys are validated and plural keys
//! (`name:quantity`) are split into their two components.

use lazy_static::lazy_static;
use regex::Regex;

/// Separator between a plural group name and its quantity in a key (`plurals1:one`).
pub const QUANTITY_SEPARATOR: char = ':';

const ARG_PLACEHOLDER: char = '#';
const SINGLE_ARG: &str = "%s";
const ESCAPED_QUOTE: &str = "\\'";

lazy_static! {
    static ref KEY_ILLEGAL_CHARS: Regex =
        Regex::new(r#"[\s+\-*/\\;,'()\[\]{}!?=@|#~&"^%<>]"#).unwrap();
}

/// A validated translation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    /// A plain `<string>` name.
    Singular(&'a str),
    /// One `<item>` of a `<plurals>` group.
    Plural { name: &'a str, quantity: &'a str },
}

/// Escapes apostrophes and rewrites `#` placeholders into format arguments.
///
/// - `l'avion` becomes `l\'avion` (an already escaped `\'` is left alone)
/// - a single `#` becomes `%s`
/// - several `#` become `%1$s`, `%2$s`, ... from left to right
///
/// Applying it twice yields the same text as applying it once.
pub fn clean_up_translated_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 8);
    let mut previous = None;
    for c in raw.chars() {
        if c == '\'' && previous != Some('\\') {
            escaped.push_str(ESCAPED_QUOTE);
        } else {
            escaped.push(c);
        }
        previous = Some(c);
    }

    let placeholders = escaped.matches(ARG_PLACEHOLDER).count();
    match placeholders {
        0 => escaped,
        1 => escaped.replace(ARG_PLACEHOLDER, SINGLE_ARG),
        _ => {
            let mut indexed = String::with_capacity(escaped.len() + placeholders * 4);
            let mut index = 0;
            for c in escaped.chars() {
                if c == ARG_PLACEHOLDER {
                    index += 1;
                    indexed.push_str(&format!("%{}$s", index));
                } else {
                    indexed.push(c);
                }
            }
            indexed
        }
    }
}

/// Reverts the apostrophe escaping done by [`clean_up_translated_text`].
pub fn unescape_quotes(text: &str) -> String {
    text.replace(ESCAPED_QUOTE, "'")
}

/// Returns `true` when the key is absent, blank, or contains an illegal character.
pub fn is_invalid_key(key: Option<&str>) -> bool {
    match key.map(str::trim) {
        None => true,
        Some(k) if k.is_empty() => true,
        Some(k) => KEY_ILLEGAL_CHARS.is_match(k),
    }
}

/// Classifies an already trimmed key as singular or plural.
///
/// Returns `None` when the key contains the quantity separator but does not
/// split into exactly two non-empty parts.
pub fn parse_key(key: &str) -> Option<Key<'_>> {
    match key.split_once(QUANTITY_SEPARATOR) {
        None => Some(Key::Singular(key)),
        Some((name, quantity))
            if !name.is_empty()
                && !quantity.is_empty()
                && !quantity.contains(QUANTITY_SEPARATOR) =>
        {
            Some(Key::Plural { name, quantity })
        }
        Some(_) => None,
    }
}

/// Builds the flattened key of a plural item, `name:quantity`.
pub fn plural_key(name: &str, quantity: &str) -> String {
    format!("{}{}{}", name, QUANTITY_SEPARATOR, quantity)
}

/// A row is empty when both its key and every value are blank.
pub fn is_empty_row<'a>(
    key: Option<&str>,
    mut values: impl Iterator<Item = Option<&'a str>>,
) -> bool {
    is_blank(key) && values.all(is_blank)
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

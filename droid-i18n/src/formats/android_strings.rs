//! Support for Android `strings.xml` resource files.
//!
//! Both `<string>` and `<plurals>` elements are supported. Output is written with
//! an XML declaration, 4-space indentation and the platform line ending, so that
//! writing the same translations twice yields byte-identical files.
//!
//! Values are kept verbatim, surrounding whitespace included. Plain text is
//! unescaped (`&amp;` reads as `&`); a value holding inline markup such as
//! `Hello <b>World</b>!` is kept as its inner XML and written back unchanged.

use std::{
    fs::File,
    io::{BufRead, Read, Write},
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use crate::{
    codec::{Key, parse_key, plural_key},
    error::Error,
    traits::Parser,
    types::{StringData, TranslationData},
};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

const INDENT: &str = "    ";

/// Content of one `values[-locale]/strings.xml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// Locale of the file; `strings.xml` itself carries no locale, it comes from the directory name.
    pub locale: String,
    pub default_locale: bool,
    pub strings: Vec<StringResource>,
    pub plurals: Vec<PluralsResource>,
}

/// A `<string name="...">value</string>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    pub value: String,
}

/// A `<plurals name="...">` element and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralsResource {
    pub name: String,
    pub items: Vec<PluralItem>,
}

/// An `<item quantity="...">value</item>` element of a plural group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralItem {
    pub quantity: String,
    pub value: String,
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut format = Format::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let name = required_attribute(e, b"name", "string")?;
                    let value = read_text(&mut xml_reader, b"string")?;
                    format.strings.push(StringResource { name, value });
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let name = required_attribute(e, b"name", "string")?;
                    format.strings.push(StringResource {
                        name,
                        value: String::new(),
                    });
                }
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"plurals" => {
                    let name = required_attribute(e, b"name", "plurals")?;
                    let items = read_plural_items(&mut xml_reader)?;
                    format.plurals.push(PluralsResource { name, items });
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"plurals" => {
                    let name = required_attribute(e, b"name", "plurals")?;
                    format.plurals.push(PluralsResource {
                        name,
                        items: Vec::new(),
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(format)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write_indent(&mut xml_writer, 0)?;
        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;

        for sr in &self.strings {
            write_indent(&mut xml_writer, 1)?;
            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", sr.name.as_str()));
            write_text_element(&mut xml_writer, elem, &sr.value)?;
        }

        for plurals in &self.plurals {
            write_indent(&mut xml_writer, 1)?;
            let mut elem = BytesStart::new("plurals");
            elem.push_attribute(("name", plurals.name.as_str()));
            xml_writer.write_event(Event::Start(elem))?;
            for item in &plurals.items {
                write_indent(&mut xml_writer, 2)?;
                let mut item_elem = BytesStart::new("item");
                item_elem.push_attribute(("quantity", item.quantity.as_str()));
                write_text_element(&mut xml_writer, item_elem, &item.value)?;
            }
            write_indent(&mut xml_writer, 1)?;
            xml_writer.write_event(Event::End(BytesEnd::new("plurals")))?;
        }

        write_indent(&mut xml_writer, 0)?;
        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::from_escaped(LINE_ENDING)))?;
        Ok(())
    }

    /// Override default file reading to decode UTF-16 files and strip byte order marks.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}

impl From<&TranslationData> for Format {
    /// Splits labels into strings and plural groups, both sorted by name.
    fn from(value: &TranslationData) -> Self {
        let mut strings = Vec::new();
        let mut plurals: Vec<PluralsResource> = Vec::new();

        for string in &value.strings {
            match parse_key(&string.name) {
                Some(Key::Plural { name, quantity }) => {
                    let item = PluralItem {
                        quantity: quantity.to_string(),
                        value: string.text.clone(),
                    };
                    match plurals.iter_mut().find(|p| p.name == name) {
                        Some(group) => group.items.push(item),
                        None => plurals.push(PluralsResource {
                            name: name.to_string(),
                            items: vec![item],
                        }),
                    }
                }
                _ => strings.push(StringResource {
                    name: string.name.clone(),
                    value: string.text.clone(),
                }),
            }
        }

        strings.sort_by(|a, b| a.name.cmp(&b.name));
        plurals.sort_by(|a, b| a.name.cmp(&b.name));

        Format {
            locale: value.locale.clone(),
            default_locale: value.default_locale,
            strings,
            plurals,
        }
    }
}

impl From<Format> for TranslationData {
    /// Flattens the file into labels: strings sorted by name, then plural items in file order.
    fn from(value: Format) -> Self {
        let mut strings: Vec<StringData> = value
            .strings
            .into_iter()
            .map(|sr| StringData::new(sr.name, sr.value))
            .collect();
        strings.sort_by(|a, b| a.name.cmp(&b.name));

        strings.extend(value.plurals.into_iter().flat_map(|plurals| {
            let name = plurals.name;
            plurals.items.into_iter().map(move |item| {
                let key = if name.trim().is_empty() {
                    item.quantity
                } else {
                    plural_key(&name, &item.quantity)
                };
                StringData::new(key, item.value)
            })
        }));

        TranslationData {
            locale: value.locale,
            default_locale: value.default_locale,
            strings,
        }
    }
}

fn write_indent<W: Write>(xml_writer: &mut Writer<W>, level: usize) -> Result<(), Error> {
    let indent = format!("{}{}", LINE_ENDING, INDENT.repeat(level));
    xml_writer.write_event(Event::Text(BytesText::from_escaped(indent)))?;
    Ok(())
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    start: BytesStart<'_>,
    value: &str,
) -> Result<(), Error> {
    let end = start.to_end().into_owned();
    xml_writer.write_event(Event::Start(start))?;
    // Apostrophes and quotes stay verbatim: Android reads `\'` escapes itself.
    let text = if is_inline_markup(value) {
        BytesText::from_escaped(value)
    } else {
        BytesText::from_escaped(partial_escape(value))
    };
    xml_writer.write_event(Event::Text(text))?;
    xml_writer.write_event(Event::End(end))?;
    Ok(())
}

fn required_attribute(e: &BytesStart<'_>, key: &[u8], tag: &str) -> Result<String, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(attr.unescape_value()?.to_string());
        }
    }
    Err(Error::InvalidResource(format!(
        "{} tag missing '{}'",
        tag,
        String::from_utf8_lossy(key)
    )))
}

fn read_plural_items<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<Vec<PluralItem>, Error> {
    let mut buf = Vec::new();
    let mut items = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"item" => {
                let quantity = required_attribute(e, b"quantity", "item")?;
                let value = read_text(xml_reader, b"item")?;
                items.push(PluralItem { quantity, value });
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"item" => {
                let quantity = required_attribute(e, b"quantity", "item")?;
                items.push(PluralItem {
                    quantity,
                    value: String::new(),
                });
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"plurals" => break,
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(items)
}

/// Reads the content up to the closing `end` tag.
///
/// Plain text comes back unescaped. As soon as the element holds nested
/// markup, CDATA or comments, its inner XML is returned as written.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut raw = String::new();
    let mut markup = false;
    let mut depth = 0usize;
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                text.push_str(&e.unescape()?);
                raw.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::CData(e)) => {
                markup = true;
                raw.push_str("<![CDATA[");
                raw.push_str(&String::from_utf8_lossy(&e));
                raw.push_str("]]>");
            }
            Ok(Event::Comment(e)) => {
                markup = true;
                raw.push_str("<!--");
                raw.push_str(&String::from_utf8_lossy(&e));
                raw.push_str("-->");
            }
            Ok(Event::Start(e)) => {
                markup = true;
                depth += 1;
                raw.push('<');
                raw.push_str(&String::from_utf8_lossy(&e));
                raw.push('>');
            }
            Ok(Event::Empty(e)) => {
                markup = true;
                raw.push('<');
                raw.push_str(&String::from_utf8_lossy(&e));
                raw.push_str("/>");
            }
            Ok(Event::End(ref e)) if depth == 0 && e.name().as_ref() == end => break,
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                raw.push_str("</");
                raw.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                raw.push('>');
            }
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(if markup { raw } else { text })
}

/// Whether `value` is a well-formed XML fragment holding at least one element,
/// CDATA section or comment. Such values are written without escaping.
///
/// Plain text that happens to read as well-formed markup (`<b>x</b>` typed in
/// a cell) is therefore written as markup too.
fn is_inline_markup(value: &str) -> bool {
    if !value.contains('<') {
        return false;
    }
    let wrapped = format!("<value>{}</value>", value);
    let mut reader = Reader::from_str(&wrapped);
    let mut depth = 0usize;
    let mut markup = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                markup |= depth > 1;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Empty(_) | Event::CData(_) | Event::Comment(_)) => markup = true,
            Ok(Event::Text(e)) => {
                if e.unescape().is_err() {
                    return false;
                }
            }
            Ok(Event::Eof) => return markup && depth == 0,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

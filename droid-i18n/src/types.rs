//! Core, format-agnostic types for droid-i18n.
//! The spreadsheet mapper decodes into these; the resource writer serializes these.

use std::collections::HashSet;

use serde::Serialize;
use unic_langid::LanguageIdentifier;

use crate::{codec::clean_up_translated_text, error::Error};

/// A whole host project: every module that carries string resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectData {
    pub modules: Vec<ModuleData>,
}

/// One module of the host project (e.g. `app`, `features.feature-one`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleData {
    /// The module name, e.g. `libraries.core-android`.
    pub name: String,

    /// One translation per locale.
    pub translations: Vec<TranslationData>,
}

/// Every label of a module in a single locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationData {
    /// Android locale qualifier (`en`, `fr-rCA`, `b+es+ES`, ...).
    pub locale: String,

    /// Whether this locale is written to the unsuffixed `values` directory.
    pub default_locale: bool,

    /// The labels, plural items being keyed `name:quantity`.
    pub strings: Vec<StringData>,
}

/// A single label: key and translated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringData {
    pub name: String,
    pub text: String,
}

impl StringData {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    fn cleaned(&self) -> Self {
        StringData::new(self.name.clone(), clean_up_translated_text(&self.text))
    }
}

impl TranslationData {
    pub fn new(locale: impl Into<String>, strings: Vec<StringData>) -> Self {
        Self {
            locale: locale.into(),
            default_locale: false,
            strings,
        }
    }

    pub fn with_default_locale(mut self, default_locale: bool) -> Self {
        self.default_locale = default_locale;
        self
    }

    pub fn find(&self, name: &str) -> Option<&StringData> {
        self.strings.iter().find(|s| s.name == name)
    }

    /// Parses the Android locale qualifier as a BCP 47 identifier.
    ///
    /// `fr-rCA` is read as `fr-CA` and `b+sr+Latn` as `sr-Latn`.
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        android_locale_to_bcp47(&self.locale).parse().ok()
    }
}

impl ModuleData {
    /// Name used for the root module and for single-module imports.
    pub const DEFAULT_NAME: &'static str = "android-i18n";

    pub fn new(name: impl Into<String>, translations: Vec<TranslationData>) -> Self {
        Self {
            name: name.into(),
            translations,
        }
    }

    /// Derives a module name from a hierarchical module path.
    ///
    /// `:features:feature-one` becomes `features.feature-one`, `:a:b:c` becomes
    /// `a.b-c` and the root path `:` becomes [`ModuleData::DEFAULT_NAME`].
    pub fn name_from_path(path: &str) -> String {
        let trimmed = path.trim_start_matches([':', '/']);
        let name = trimmed
            .replacen([':', '/'], ".", 1)
            .replace([':', '/'], "-");
        if name.is_empty() {
            ModuleData::DEFAULT_NAME.to_string()
        } else {
            name
        }
    }

    pub fn translation(&self, locale: &str) -> Option<&TranslationData> {
        self.translations.iter().find(|t| t.locale == locale)
    }

    /// Whether no locale of the module holds any label.
    pub fn is_empty(&self) -> bool {
        self.translations.iter().all(|t| t.strings.is_empty())
    }
}

impl ProjectData {
    pub fn new(modules: Vec<ModuleData>) -> Self {
        Self { modules }
    }

    pub fn module(&self, name: &str) -> Option<&ModuleData> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Pretty-printed JSON dump of the project.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Makes `source` the single owner of the labels it shares with other modules.
    ///
    /// Labels of the `source` module that exist, for the same locale, in any
    /// other module are removed from `source`; those other modules receive the
    /// `source` text instead of their own. All resulting texts are cleaned up.
    pub fn deduplicated(&self, source: &str) -> ProjectData {
        let source_module = self.module(source);
        let modules = self
            .modules
            .iter()
            .map(|module| {
                if module.name == source {
                    self.narrowed_source(module)
                } else {
                    overridden_by(module, source_module)
                }
            })
            .collect();
        ProjectData { modules }
    }

    fn narrowed_source(&self, source: &ModuleData) -> ModuleData {
        let translations = source
            .translations
            .iter()
            .map(|translation| {
                let elsewhere: HashSet<&str> = self
                    .modules
                    .iter()
                    .filter(|m| m.name != source.name)
                    .filter_map(|m| m.translation(&translation.locale))
                    .flat_map(|t| t.strings.iter().map(|s| s.name.as_str()))
                    .collect();
                TranslationData {
                    strings: translation
                        .strings
                        .iter()
                        .filter(|s| !elsewhere.contains(s.name.as_str()))
                        .map(StringData::cleaned)
                        .collect(),
                    ..translation.clone()
                }
            })
            .collect();
        ModuleData::new(source.name.clone(), translations)
    }
}

fn overridden_by(module: &ModuleData, source: Option<&ModuleData>) -> ModuleData {
    let translations = module
        .translations
        .iter()
        .map(|translation| {
            let source_translation = source.and_then(|s| s.translation(&translation.locale));
            TranslationData {
                strings: translation
                    .strings
                    .iter()
                    .map(|string| {
                        source_translation
                            .and_then(|t| t.find(&string.name))
                            .map(|overriding| {
                                StringData::new(string.name.clone(), overriding.text.clone())
                            })
                            .unwrap_or_else(|| string.clone())
                            .cleaned()
                    })
                    .collect(),
                ..translation.clone()
            }
        })
        .collect();
    ModuleData::new(module.name.clone(), translations)
}

/// Converts an Android resource qualifier into a BCP 47 tag.
pub fn android_locale_to_bcp47(locale: &str) -> String {
    if let Some(tags) = locale.strip_prefix("b+") {
        return tags.replace('+', "-");
    }
    match locale.split_once("-r") {
        Some((language, region)) if !language.contains('-') => format!("{}-{}", language, region),
        _ => locale.to_string(),
    }
}

//! Display-language string lookup.
//!
//! Locale tables are JSON documents, one per language, holding nested
//! string lookups addressed by dotted-path keys with `{placeholder}`-style
//! interpolation. A missing key degrades softly: the key itself becomes
//! the display text, so the UI never crashes over a translation gap.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde_json::Value;

/// Display languages the `--lang` flag accepts.
pub const SUPPORTED_UI_LANGUAGES: [&str; 3] = ["en", "zh", "ja"];

pub const DEFAULT_UI_LANGUAGE: &str = "en";

/// Validate a requested display language against the allow-list, falling
/// back to the built-in default for unrecognized or absent values.
pub fn resolve_ui_language(requested: Option<&str>) -> &'static str {
    match requested {
        None => DEFAULT_UI_LANGUAGE,
        Some(code) => match SUPPORTED_UI_LANGUAGES.iter().find(|lang| **lang == code) {
            Some(lang) => lang,
            None => {
                warn!("unsupported display language {code:?}, using {DEFAULT_UI_LANGUAGE}");
                DEFAULT_UI_LANGUAGE
            }
        },
    }
}

pub struct Translator {
    tables: HashMap<String, Value>,
    current: String,
    default_language: String,
}

impl Translator {
    /// Load every `<code>.json` table from a locales directory.
    ///
    /// A missing directory or an unreadable file is a warning, not an
    /// error; lookups then fall through to the key itself.
    pub fn load(dir: &Path, default_language: &str) -> Self {
        let mut tables = HashMap::new();

        match fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                        continue;
                    }
                    let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
                        continue;
                    };
                    match read_table(&path) {
                        Ok(table) => {
                            debug!("loaded {code} locale from {}", path.display());
                            tables.insert(code.to_string(), table);
                        }
                        Err(err) => warn!("skipping locale file {}: {err}", path.display()),
                    }
                }
            }
            Err(_) => warn!("locales directory {} not found", dir.display()),
        }

        Self {
            tables,
            current: default_language.to_string(),
            default_language: default_language.to_string(),
        }
    }

    /// Build a translator from in-memory tables.
    pub fn from_tables(tables: HashMap<String, Value>, default_language: &str) -> Self {
        Self {
            tables,
            current: default_language.to_string(),
            default_language: default_language.to_string(),
        }
    }

    /// Switch the display language; unknown codes revert to the default.
    pub fn set_language(&mut self, language: &str) {
        if self.tables.contains_key(language) {
            self.current = language.to_string();
        } else {
            warn!(
                "language {language} not available, staying on {}",
                self.default_language
            );
            self.current = self.default_language.clone();
        }
    }

    pub fn current_language(&self) -> &str {
        &self.current
    }

    pub fn available_languages(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Resolve a dotted-path key (`table_headers.no`) against the current
    /// language, falling through to the default language's table.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let table = self
            .tables
            .get(&self.current)
            .or_else(|| self.tables.get(&self.default_language))?;

        let mut node = table;
        for part in key.split('.') {
            node = node.get(part)?;
        }
        node.as_str().map(str::to_string)
    }

    /// Look up a key and interpolate `{placeholder}` markers. A miss
    /// collapses to the key itself at this boundary.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let Some(mut text) = self.lookup(key) else {
            return key.to_string();
        };
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

fn read_table(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&text).map_err(|err| err.to_string())
}

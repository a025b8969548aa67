use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator between translation fragments and between rendered dictionary lines.
pub const LINE_SEPARATOR: &str = "\n";

/// The two upstream services. Their direction universes are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Translation,
    Dictionary,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Translation => "translation",
            Service::Dictionary => "dictionary",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-word payloads are translated, single words are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Translate,
    Lookup,
}

impl Intent {
    pub fn service(&self) -> Service {
        match self {
            Intent::Translate => Service::Translation,
            Intent::Lookup => Service::Dictionary,
        }
    }
}

/// `getLangs` answer of the translation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationDirections {
    #[serde(default)]
    pub dirs: Vec<String>,
    #[serde(default)]
    pub langs: HashMap<String, String>,
}

impl TranslationDirections {
    pub fn language_name(&self, code: &str) -> Option<&str> {
        self.langs.get(code).map(String::as_str)
    }
}

/// `getLangs` answer of the dictionary service: a flat list of directions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictionaryDirections(pub Vec<String>);

#[derive(Debug, Clone)]
pub enum Directions {
    Translation(TranslationDirections),
    Dictionary(DictionaryDirections),
}

impl Directions {
    /// Reduces either shape to a sorted, de-duplicated list of direction codes.
    pub fn into_sorted(self) -> Vec<String> {
        let mut dirs = match self {
            Directions::Translation(t) => t.dirs,
            Directions::Dictionary(DictionaryDirections(d)) => d,
        };
        dirs.sort_unstable();
        dirs.dedup();
        dirs
    }
}

/// `translate` answer of the translation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationResult {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub text: Vec<String>,
}

/// `lookup` answer of the dictionary service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionaryResult {
    #[serde(default)]
    pub head: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub def: Vec<Article>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub gen: String,
    #[serde(default)]
    pub tr: Vec<TranslationEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationEntry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub syn: Vec<TextItem>,
    #[serde(default)]
    pub mean: Vec<TextItem>,
    #[serde(default)]
    pub ex: Vec<Example>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub gen: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub tr: Vec<TextItem>,
}

#[derive(Debug, Clone)]
pub enum UpstreamReply {
    Translation(TranslationResult),
    Dictionary(DictionaryResult),
}

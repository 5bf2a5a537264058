//! Storefront languages and localized backend text.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Languages the storefront ships message catalogs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Pt,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Self; 3] = [Self::En, Self::Es, Self::Pt];

    /// ISO 639-1 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Pt => "pt",
        }
    }

    /// Name of the language in itself, for the language picker.
    #[must_use]
    pub const fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Español",
            Self::Pt => "Português",
        }
    }

    /// Parse a language tag such as `es`, `es-AR` or `PT_br`.
    #[must_use]
    pub fn from_code(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "pt" => Some(Self::Pt),
            _ => None,
        }
    }

    /// Pick the preferred supported language from an `Accept-Language` header.
    ///
    /// Entries are ordered by their `q` weight (missing weight = 1.0); ties keep
    /// header order. Entries with `q=0` are ignored.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, Self)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut parts = entry.split(';');
                let language = Self::from_code(parts.next()?)?;
                let weight = parts
                    .find_map(|param| param.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (weight > 0.0).then_some((weight, position, language))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|(_, _, language)| *language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Text stored per language in a backend `jsonb` column.
///
/// Rows written before a brand went multilingual hold a plain string; that
/// value is kept as the language-neutral entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

/// Map key used for language-neutral text.
const NEUTRAL_KEY: &str = "";

impl LocalizedText {
    /// Text that reads the same in every language.
    #[must_use]
    pub fn neutral(text: impl Into<String>) -> Self {
        Self(BTreeMap::from([(NEUTRAL_KEY.to_string(), text.into())]))
    }

    /// Build from `(language, text)` pairs.
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (Language, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(language, text)| (language.code().to_string(), text.to_string()))
                .collect(),
        )
    }

    /// Exact translation, if present and non-empty.
    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        self.non_empty(language.code())
    }

    /// Resolve the text to show.
    ///
    /// Order: requested language, brand fallback, English, neutral text, any
    /// non-empty translation, empty string.
    #[must_use]
    pub fn resolve(&self, language: Language, fallback: Language) -> &str {
        self.get(language)
            .or_else(|| self.get(fallback))
            .or_else(|| self.get(Language::En))
            .or_else(|| self.non_empty(NEUTRAL_KEY))
            .or_else(|| self.0.values().map(String::as_str).find(|t| !t.trim().is_empty()))
            .unwrap_or_default()
    }

    /// True when no entry has visible text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|text| text.trim().is_empty())
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Plain(String),
            Map(BTreeMap<String, Option<String>>),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Self::default(),
            Some(Raw::Plain(text)) => Self::neutral(text),
            Some(Raw::Map(map)) => Self(
                map.into_iter()
                    .filter_map(|(key, text)| Some((key.to_ascii_lowercase(), text?)))
                    .collect(),
            ),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_regional_tags() {
        assert_eq!(Language::from_code("es-AR"), Some(Language::Es));
        assert_eq!(Language::from_code("PT_br"), Some(Language::Pt));
        assert_eq!(Language::from_code("de"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn accept_language_respects_weights() {
        assert_eq!(
            Language::from_accept_language("de-DE, en;q=0.5, pt-BR;q=0.9"),
            Some(Language::Pt)
        );
        assert_eq!(
            Language::from_accept_language("es-MX,es;q=0.9"),
            Some(Language::Es)
        );
        assert_eq!(Language::from_accept_language("fr, de"), None);
        assert_eq!(Language::from_accept_language("en;q=0, es;q=0.1"), Some(Language::Es));
    }

    #[test]
    fn resolve_prefers_requested_language() {
        let text = LocalizedText::from_pairs([(Language::En, "Shirt"), (Language::Es, "Camisa")]);
        assert_eq!(text.resolve(Language::Es, Language::En), "Camisa");
    }

    #[test]
    fn resolve_falls_back_to_brand_language_then_english() {
        let text = LocalizedText::from_pairs([(Language::En, "Shirt"), (Language::Es, "Camisa")]);
        assert_eq!(text.resolve(Language::Pt, Language::Es), "Camisa");

        let english_only = LocalizedText::from_pairs([(Language::En, "Shirt")]);
        assert_eq!(english_only.resolve(Language::Pt, Language::Es), "Shirt");
    }

    #[test]
    fn empty_translation_counts_as_missing() {
        let text = LocalizedText::from_pairs([(Language::Es, ""), (Language::Pt, "Camisa")]);
        assert_eq!(text.resolve(Language::Es, Language::Es), "Camisa");
    }

    #[test]
    fn deserializes_plain_string_and_null_entries() {
        let plain: LocalizedText = serde_json::from_str("\"Gift card\"").unwrap();
        assert_eq!(plain.resolve(Language::Es, Language::En), "Gift card");

        let map: LocalizedText =
            serde_json::from_str(r#"{"EN": "Hat", "es": null}"#).unwrap();
        assert_eq!(map.resolve(Language::Es, Language::Es), "Hat");

        let null: LocalizedText = serde_json::from_str("null").unwrap();
        assert!(null.is_blank());
        assert_eq!(null.resolve(Language::En, Language::En), "");
    }
}

//! Message catalogs and request language selection.
//!
//! Catalogs are flat `key -> text` JSON maps embedded at compile time from
//! `locales/{en,es,pt}.json`. Lookups fall back to the brand's default
//! language, then English, then the key itself, so a missing translation
//! shows up as its key rather than an empty string.
//!
//! The request language is, in order: the visitor's explicit choice stored in
//! the session, the best match from `Accept-Language`, the brand default.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use thiserror::Error;
use tower_sessions::Session;
use vitrine_core::Language;

use crate::models::session_keys;

const EMBEDDED: [(Language, &str); 3] = [
    (Language::En, include_str!("../locales/en.json")),
    (Language::Es, include_str!("../locales/es.json")),
    (Language::Pt, include_str!("../locales/pt.json")),
];

/// Catalog loading error.
#[derive(Debug, Error)]
#[error("Invalid message catalog for {language}: {source}")]
pub struct CatalogError {
    language: Language,
    #[source]
    source: serde_json::Error,
}

/// Messages for every supported language.
#[derive(Debug, Default)]
pub struct Catalog {
    messages: HashMap<Language, HashMap<String, String>>,
}

impl Catalog {
    /// Load the catalogs compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded catalog is not a flat JSON string map.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(&EMBEDDED)
    }

    /// Load catalogs from `(language, json)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a document is not a flat JSON string map.
    pub fn from_json(sources: &[(Language, &str)]) -> Result<Self, CatalogError> {
        let mut messages = HashMap::new();
        for &(language, json) in sources {
            let map: HashMap<String, String> = serde_json::from_str(json)
                .map_err(|source| CatalogError { language, source })?;
            messages.insert(language, map);
        }
        Ok(Self { messages })
    }

    /// Exact translation of `key`, if present and non-empty.
    #[must_use]
    pub fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.messages
            .get(&language)?
            .get(key)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }
}

/// Catalog view for one request's language.
///
/// Cheap to clone; templates hold one and call [`Messages::t`].
#[derive(Debug, Clone)]
pub struct Messages {
    catalog: Arc<Catalog>,
    language: Language,
    fallback: Language,
}

impl Messages {
    /// Messages in `language`, falling back to `fallback` (the brand default).
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>, language: Language, fallback: Language) -> Self {
        Self {
            catalog,
            language,
            fallback,
        }
    }

    /// Language of this request.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Brand default language.
    #[must_use]
    pub const fn fallback(&self) -> Language {
        self.fallback
    }

    /// Translate `key`.
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.catalog
            .lookup(self.language, key)
            .or_else(|| self.catalog.lookup(self.fallback, key))
            .or_else(|| self.catalog.lookup(Language::En, key))
            .unwrap_or(key)
    }

    /// Translate `key` and substitute `{name}` placeholders.
    #[must_use]
    pub fn format(&self, key: &str, args: &[(&str, &dyn Display)]) -> String {
        args.iter()
            .fold(self.t(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), &value.to_string())
            })
    }

    /// Single-placeholder [`Messages::format`], callable from templates.
    #[must_use]
    pub fn with(&self, key: &str, name: &str, value: impl Display) -> String {
        self.format(key, &[(name, &value)])
    }
}

/// Pick the request language.
#[must_use]
pub fn resolve_language(
    chosen: Option<Language>,
    accept_language: Option<&str>,
    default: Language,
) -> Language {
    chosen
        .or_else(|| accept_language.and_then(Language::from_accept_language))
        .unwrap_or(default)
}

/// Language the visitor picked explicitly, if any.
pub async fn session_language(session: &Session) -> Option<Language> {
    session
        .get::<Language>(session_keys::LANGUAGE)
        .await
        .ok()
        .flatten()
}

/// Remember the visitor's language choice.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_language(
    session: &Session,
    language: Language,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::LANGUAGE, language).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_json(&[
                (Language::En, r#"{"greeting": "Hello", "only.en": "English only", "cart.count": "{count} items"}"#),
                (Language::Es, r#"{"greeting": "Hola", "only.es": "Solo español", "cart.count": ""}"#),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_lookup_falls_back_to_brand_default_then_english_then_key() {
        let pt = Messages::new(catalog(), Language::Pt, Language::Es);
        assert_eq!(pt.t("greeting"), "Hola");
        assert_eq!(pt.t("only.es"), "Solo español");
        assert_eq!(pt.t("only.en"), "English only");
        assert_eq!(pt.t("missing.key"), "missing.key");
    }

    #[test]
    fn test_empty_translation_counts_as_missing() {
        let es = Messages::new(catalog(), Language::Es, Language::Es);
        assert_eq!(es.format("cart.count", &[("count", &3)]), "3 items");
        assert_eq!(es.with("cart.count", "count", 5), "5 items");
    }

    #[test]
    fn test_resolve_language_order() {
        assert_eq!(
            resolve_language(Some(Language::Pt), Some("es-AR,es;q=0.9"), Language::En),
            Language::Pt
        );
        assert_eq!(
            resolve_language(None, Some("fr-FR, es;q=0.8, en;q=0.5"), Language::En),
            Language::Es
        );
        assert_eq!(resolve_language(None, Some("fr, de"), Language::Pt), Language::Pt);
        assert_eq!(resolve_language(None, None, Language::Es), Language::Es);
    }

    #[test]
    fn test_embedded_catalogs_cover_english_keys() {
        let catalog = Catalog::embedded().unwrap();
        let english = catalog.messages.get(&Language::En).unwrap();
        for language in [Language::Es, Language::Pt] {
            let translated = catalog.messages.get(&language).unwrap();
            for key in english.keys() {
                assert!(
                    translated.contains_key(key),
                    "{language} catalog is missing {key}"
                );
            }
        }
    }
}

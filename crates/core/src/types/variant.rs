//! Product variant schema, customer selections, and label rendering.
//!
//! A product's `variants` column describes which attributes a customer can
//! pick (size, color, ...) and the allowed values of each. A selection is the
//! key/value set the customer picked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::locale::{Language, LocalizedText};

/// One configurable attribute of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAttribute {
    /// Attribute key used in selections (e.g. `size`).
    pub name: String,
    /// Localized label shown to customers (e.g. "Talle").
    #[serde(default)]
    pub label: LocalizedText,
    /// Allowed values.
    #[serde(default)]
    pub options: Vec<String>,
}

impl VariantAttribute {
    /// Label to show, falling back to the attribute key.
    #[must_use]
    pub fn display_label(&self, language: Language, fallback: Language) -> &str {
        let label = self.label.resolve(language, fallback);
        if label.is_empty() { &self.name } else { label }
    }
}

/// Ordered list of attributes a product can be configured with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSchema(Vec<VariantAttribute>);

impl VariantSchema {
    /// Build a schema from attributes, keeping their order.
    #[must_use]
    pub const fn new(attributes: Vec<VariantAttribute>) -> Self {
        Self(attributes)
    }

    /// Attributes in display order.
    #[must_use]
    pub fn attributes(&self) -> &[VariantAttribute] {
        &self.0
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&VariantAttribute> {
        self.0.iter().find(|attribute| attribute.name == name)
    }

    /// True when the product has no configurable attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that `selection` only uses attributes and values of this schema.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::UnknownAttribute`] for a key the schema does not
    /// define, and [`VariantError::InvalidOption`] for a value outside the
    /// attribute's options.
    pub fn validate(&self, selection: &VariantSelection) -> Result<(), VariantError> {
        for (name, value) in selection.iter() {
            let attribute = self
                .attribute(name)
                .ok_or_else(|| VariantError::UnknownAttribute(name.to_string()))?;

            if !attribute.options.iter().any(|option| option == value) {
                return Err(VariantError::InvalidOption {
                    attribute: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Render a selection as `"Size: M / Color: Red"`.
    ///
    /// Attributes appear in schema order; unselected attributes are skipped;
    /// selected keys unknown to the schema are ignored.
    #[must_use]
    pub fn render_label(
        &self,
        selection: &VariantSelection,
        language: Language,
        fallback: Language,
    ) -> String {
        self.0
            .iter()
            .filter_map(|attribute| {
                selection.get(&attribute.name).map(|value| {
                    format!("{}: {value}", attribute.display_label(language, fallback))
                })
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Attribute key → chosen value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSelection(BTreeMap<String, String>);

impl VariantSelection {
    /// An empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace a choice. Blank values are dropped.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a choice. Blank values are dropped.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.0.remove(&name);
        } else {
            self.0.insert(name, value);
        }
    }

    /// Chosen value for an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Choices in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when nothing was chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical `k=v;k=v` encoding, used in cart line keys.
    ///
    /// Backslashes, `;`, `=` and `|` inside names and values are escaped with a
    /// backslash, so distinct selections never share an encoding.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", escape_key_part(k), escape_key_part(v)))
            .collect::<Vec<_>>()
            .join(";")
    }
}

fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if matches!(c, '\\' | ';' | '=' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariantSelection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (name, value) in iter {
            selection.insert(name, value);
        }
        selection
    }
}

/// A selection that does not fit the product's schema.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("product has no variant attribute named '{0}'")]
    UnknownAttribute(String),
    #[error("'{value}' is not an option of '{attribute}'")]
    InvalidOption { attribute: String, value: String },
}

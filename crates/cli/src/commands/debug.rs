//! Debug helpers: text compression, price selection, variant labels.
//!
//! # Usage
//!
//! ```bash
//! vt-cli debug compress "order notes"
//! vt-cli debug price -u wholesale -r 10 -w 8
//! vt-cli debug variant-label -s '[{"name":"size","label":{"es":"Talle"},"options":["S","M"]}]' --select size=M -l es
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use vitrine_core::{
    CurrencyCode, Language, Price, UnknownCurrency, UserType, VariantError, VariantSchema,
    VariantSelection, select_price,
};
use vitrine_storefront::debug::{compress_text, decompress_text};

/// Errors that can occur in debug commands.
#[derive(Debug, Error)]
pub enum DebugError {
    /// Compression produced no output.
    #[error("Failed to compress text")]
    Compress,

    /// Input is not gzip + base64 data.
    #[error("Failed to decompress data (expected base64-encoded gzip)")]
    Decompress,

    /// Unsupported currency.
    #[error(transparent)]
    Currency(#[from] UnknownCurrency),

    /// Unsupported language code.
    #[error("Unsupported language: {0}")]
    Language(String),

    /// Variant schema is not valid JSON.
    #[error("Invalid variant schema: {0}")]
    Schema(#[from] serde_json::Error),

    /// A `--select` argument is not `attribute=value`.
    #[error("Invalid selection {0:?}, expected attribute=value")]
    Selection(String),

    /// The selection does not fit the schema.
    #[error(transparent)]
    Variant(#[from] VariantError),
}

/// gzip then base64 `text`.
///
/// # Errors
///
/// Returns [`DebugError::Compress`] if compression fails.
pub fn compress(text: &str) -> Result<String, DebugError> {
    compress_text(text).ok_or(DebugError::Compress)
}

/// Reverse [`compress`].
///
/// # Errors
///
/// Returns [`DebugError::Decompress`] for data that is not base64 gzip.
pub fn decompress(data: &str) -> Result<String, DebugError> {
    decompress_text(data).ok_or(DebugError::Decompress)
}

/// Price a customer of `user_type` pays.
///
/// # Errors
///
/// Returns [`DebugError::Currency`] for an unsupported currency code.
pub fn price(
    user_type: UserType,
    retail: Decimal,
    wholesale: Option<Decimal>,
    currency: &str,
) -> Result<Price, DebugError> {
    let currency: CurrencyCode = currency.parse()?;
    Ok(select_price(
        user_type,
        Price::new(retail, currency),
        wholesale.map(|amount| Price::new(amount, currency)),
    ))
}

/// Parse `attribute=value` arguments into a selection.
fn parse_selection(selections: &[String]) -> Result<VariantSelection, DebugError> {
    let mut selection = VariantSelection::new();
    for raw in selections {
        let (name, value) = raw
            .split_once('=')
            .filter(|(name, _)| !name.trim().is_empty())
            .ok_or_else(|| DebugError::Selection(raw.clone()))?;
        selection.insert(name.trim(), value.trim());
    }
    Ok(selection)
}

/// Render the label of `selections` against a JSON variant schema.
///
/// # Errors
///
/// Returns an error for an unparsable schema, a malformed selection argument,
/// a selection the schema rejects, or an unsupported language.
pub fn variant_label(
    schema: &str,
    selections: &[String],
    language: &str,
) -> Result<String, DebugError> {
    let language =
        Language::from_code(language).ok_or_else(|| DebugError::Language(language.to_string()))?;
    let schema: VariantSchema = serde_json::from_str(schema)?;
    let selection = parse_selection(selections)?;
    schema.validate(&selection)?;

    Ok(schema.render_label(&selection, language, Language::En))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"[
        {"name": "size", "label": {"en": "Size", "es": "Talle"}, "options": ["S", "M"]},
        {"name": "color", "label": {"en": "Color"}, "options": ["Red", "Blue"]}
    ]"#;

    #[test]
    fn test_compress_round_trip() {
        let data = compress("pedido 42").unwrap();
        assert_eq!(decompress(&data).unwrap(), "pedido 42");
        assert!(matches!(decompress("%%%"), Err(DebugError::Decompress)));
    }

    #[test]
    fn test_price_selection() {
        let wholesale = price(
            UserType::Wholesale,
            Decimal::new(10, 0),
            Some(Decimal::new(8, 0)),
            "usd",
        )
        .unwrap();
        assert_eq!(wholesale.display(), "$8.00");

        let retail = price(UserType::Retail, Decimal::new(10, 0), Some(Decimal::new(8, 0)), "EUR")
            .unwrap();
        assert_eq!(retail.amount, Decimal::new(10, 0));

        assert!(matches!(
            price(UserType::Retail, Decimal::ONE, None, "XYZ"),
            Err(DebugError::Currency(_))
        ));
    }

    #[test]
    fn test_variant_label_in_schema_order() {
        let selections = vec!["color=Blue".to_string(), "size=M".to_string()];
        assert_eq!(
            variant_label(SCHEMA, &selections, "es").unwrap(),
            "Talle: M / Color: Blue"
        );
    }

    #[test]
    fn test_variant_label_rejects_bad_input() {
        assert!(matches!(
            variant_label(SCHEMA, &["size".to_string()], "en"),
            Err(DebugError::Selection(_))
        ));
        assert!(matches!(
            variant_label(SCHEMA, &["size=XL".to_string()], "en"),
            Err(DebugError::Variant(_))
        ));
        assert!(matches!(
            variant_label("{", &[], "en"),
            Err(DebugError::Schema(_))
        ));
        assert!(matches!(
            variant_label(SCHEMA, &[], "fr"),
            Err(DebugError::Language(_))
        ));
    }
}

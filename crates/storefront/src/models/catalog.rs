//! Catalog rows: `products` and `offers`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{
    CurrencyCode, LocalizedText, OfferId, Price, ProductId, UserType, VariantSchema, select_price,
};

use super::null_as_default;

/// Row of the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub category: Option<String>,
    pub retail_price: Decimal,
    #[serde(default)]
    pub wholesale_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: VariantSchema,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Product {
    /// Unit price for a customer of `user_type`.
    #[must_use]
    pub fn price_for(&self, user_type: UserType, currency: CurrencyCode) -> Price {
        select_price(
            user_type,
            Price::new(self.retail_price, currency),
            self.wholesale_price
                .map(|amount| Price::new(amount, currency)),
        )
    }

    /// Retail price, shown struck through next to a wholesale price.
    #[must_use]
    pub fn retail(&self, currency: CurrencyCode) -> Price {
        Price::new(self.retail_price, currency)
    }
}

/// Row of the `offers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub position: i32,
}

impl Offer {
    /// Whether the offer should be shown at `now`.
    ///
    /// The window is inclusive of `starts_at` and exclusive of `ends_at`;
    /// a missing bound is open.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.starts_at.is_none_or(|start| start <= now)
            && self.ends_at.is_none_or(|end| now < end)
    }
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn product(json: serde_json::Value) -> Product {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn product_row_deserializes_with_defaults() {
        let p = product(serde_json::json!({
            "id": 3,
            "name": {"en": "Mate cup", "es": "Mate"},
            "retail_price": 12.5
        }));
        assert!(p.active);
        assert!(p.variants.is_empty());

        let p = product(serde_json::json!({
            "id": 4,
            "retail_price": 3,
            "variants": null
        }));
        assert!(p.variants.is_empty());
        assert_eq!(p.wholesale_price, None);
    }

    #[test]
    fn product_price_depends_on_user_type() {
        let p = product(serde_json::json!({
            "id": 3,
            "retail_price": "12.50",
            "wholesale_price": "9.00"
        }));
        assert_eq!(
            p.price_for(UserType::Wholesale, CurrencyCode::USD).display(),
            "$9.00"
        );
        assert_eq!(
            p.price_for(UserType::Retail, CurrencyCode::USD).display(),
            "$12.50"
        );
    }

    #[test]
    fn offer_window_is_half_open() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap();
        let offer: Offer = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Week sale",
            "starts_at": start,
            "ends_at": end
        }))
        .unwrap();

        assert!(offer.is_live(start));
        assert!(offer.is_live(end - chrono::Duration::seconds(1)));
        assert!(!offer.is_live(end));
        assert!(!offer.is_live(start - chrono::Duration::seconds(1)));
    }

    #[test]
    fn inactive_offer_is_never_live() {
        let offer: Offer = serde_json::from_value(serde_json::json!({
            "id": 2,
            "active": false
        }))
        .unwrap();
        assert!(!offer.is_live(Utc::now()));
    }
}

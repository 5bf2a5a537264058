//! Order rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vitrine_core::{CurrencyCode, OrderId, OrderNumber, OrderStatus, Price, ProductId, UserId};

use super::null_as_default;

/// One line of an order, snapshotted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub variant_label: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub user_id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub currency: CurrencyCode,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Order total as a price.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::new(self.total, self.currency)
    }
}

/// Insert payload for the `orders` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub order_number: OrderNumber,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub currency: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewOrder {
    /// Build a pending order; the total is the sum of the line totals.
    #[must_use]
    pub fn pending(
        order_number: OrderNumber,
        user_id: UserId,
        items: Vec<OrderItem>,
        currency: CurrencyCode,
        notes: Option<String>,
    ) -> Self {
        let total = items.iter().map(OrderItem::line_total).sum();
        Self {
            order_number,
            user_id,
            status: OrderStatus::Pending,
            items,
            total,
            currency,
            notes,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pending_order_sums_line_totals() {
        let items = vec![
            OrderItem {
                product_id: ProductId::new(1),
                name: "Mate".to_string(),
                variant_label: String::new(),
                quantity: 2,
                unit_price: Decimal::new(1250, 2),
            },
            OrderItem {
                product_id: ProductId::new(2),
                name: "Bombilla".to_string(),
                variant_label: "Color: Silver".to_string(),
                quantity: 1,
                unit_price: Decimal::new(500, 2),
            },
        ];
        let order = NewOrder::pending(
            OrderNumber::new(1001),
            "0b5e2b8e-7f1a-4a55-b1a4-1c3f6e9d2a10".parse().unwrap(),
            items,
            CurrencyCode::USD,
            None,
        );
        assert_eq!(order.total, Decimal::new(3000, 2));
        assert_eq!(order.status, OrderStatus::Pending);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["order_number"], 1001);
        assert_eq!(json["status"], "pending");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn null_status_and_items_read_as_defaults() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 4,
            "order_number": 1003,
            "user_id": "0b5e2b8e-7f1a-4a55-b1a4-1c3f6e9d2a10",
            "status": null,
            "items": null,
            "total": "0.00",
            "currency": "USD",
            "created_at": "2026-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.items.is_empty());
    }
}

//! Orders: numbering, checkout and history.
//!
//! Order numbers are assigned client-side as "highest existing number plus
//! one". Nothing guards the read-then-insert window; if two checkouts race,
//! the backend's unique constraint on `order_number` rejects the second insert
//! and the caller sees [`BackendError::Conflict`].

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};
use vitrine_core::{Cart, CurrencyCode, Language, OrderNumber, OrderStatus, UserType};

use crate::backend::{BackendClient, BackendError, Direction, Query};
use crate::config::BrandConfig;
use crate::models::{CurrentUser, NewOrder, Order, OrderItem, Product};
use crate::services::ProductService;

const TABLE: &str = "orders";

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing purchasable in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Backend request failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Deserialize)]
struct OrderNumberRow {
    order_number: OrderNumber,
}

#[derive(Deserialize)]
struct OrderStatusRow {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    status: OrderStatus,
}

/// Access to the `orders` table.
pub struct OrderService<'a> {
    backend: &'a BackendClient,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Next order number: the current maximum plus one, or `start` when no
    /// order exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, access_token))]
    pub async fn next_order_number(
        &self,
        start: OrderNumber,
        access_token: Option<&str>,
    ) -> Result<OrderNumber, BackendError> {
        let query = Query::new()
            .select("order_number")
            .order("order_number", Direction::Desc);

        let latest: Option<OrderNumberRow> =
            self.backend.select_first(TABLE, &query, access_token).await?;

        Ok(latest.map_or(start, |row| row.order_number.next()))
    }

    /// Place an order for everything in `cart`.
    ///
    /// Prices are taken from the current product rows at the user's pricing
    /// tier. Lines whose product is gone or inactive are left out.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if no line can be ordered, or
    /// [`CheckoutError::Backend`] if a backend request fails (including
    /// [`BackendError::Conflict`] when the order number was taken meanwhile).
    #[instrument(skip(self, user, cart, brand), fields(user_id = %user.id, lines = cart.lines().len()))]
    pub async fn place(
        &self,
        user: &CurrentUser,
        cart: &Cart,
        brand: &BrandConfig,
        language: Language,
        notes: Option<String>,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let products = ProductService::new(self.backend)
            .get_many(&cart.product_ids())
            .await?;

        let items = order_items(
            cart,
            &products,
            user.user_type,
            brand.currency,
            language,
            brand.default_language,
        );
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let token = Some(user.access_token.as_str());
        let number = self
            .next_order_number(brand.order_number_start, token)
            .await?;

        let notes = notes.filter(|n| !n.trim().is_empty());
        let new_order = NewOrder::pending(number, user.id, items, brand.currency, notes);
        let order: Order = self.backend.insert(TABLE, &new_order, token).await?;

        info!(order_number = %order.order_number, total = %order.total, "Order placed");
        Ok(order)
    }

    /// Orders of `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_for_user(&self, user: &CurrentUser) -> Result<Vec<Order>, BackendError> {
        let query = Query::new()
            .eq("user_id", user.id)
            .order("created_at", Direction::Desc);
        self.backend
            .select(TABLE, &query, Some(&user.access_token))
            .await
    }

    /// One order of `user` by its number.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the user has no such order.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_by_number(
        &self,
        user: &CurrentUser,
        number: OrderNumber,
    ) -> Result<Order, BackendError> {
        let query = Query::new()
            .eq("order_number", number)
            .eq("user_id", user.id);
        self.backend
            .select_first(TABLE, &query, Some(&user.access_token))
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("order {number}")))
    }

    /// Current status of one order, for the polled status fragment.
    ///
    /// Overlapping polls by the same user share one backend request.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the user has no such order.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn status(
        &self,
        user: &CurrentUser,
        number: OrderNumber,
    ) -> Result<OrderStatus, BackendError> {
        let query = Query::new()
            .select("status")
            .eq("order_number", number)
            .eq("user_id", user.id);
        let rows: Vec<OrderStatusRow> = self
            .backend
            .select_deduplicated(
                &user.id.to_string(),
                TABLE,
                &query,
                Some(&user.access_token),
            )
            .await?;

        rows.into_iter()
            .next()
            .map(|row| row.status)
            .ok_or_else(|| BackendError::NotFound(format!("order {number}")))
    }
}

/// Snapshot cart lines into order items.
///
/// Names and variant labels are rendered in `language`; unit prices follow
/// `user_type`. Lines without a matching active product are skipped.
#[must_use]
pub fn order_items(
    cart: &Cart,
    products: &[Product],
    user_type: UserType,
    currency: CurrencyCode,
    language: Language,
    fallback: Language,
) -> Vec<OrderItem> {
    cart.lines()
        .iter()
        .filter_map(|line| {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id && p.active)?;
            Some(OrderItem {
                product_id: product.id,
                name: product.name.resolve(language, fallback).to_string(),
                variant_label: product.variants.render_label(&line.variant, language, fallback),
                quantity: line.quantity,
                unit_price: product.price_for(user_type, currency).amount,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use vitrine_core::{ProductId, VariantSelection};

    use super::*;

    fn products() -> Vec<Product> {
        serde_json::from_value(serde_json::json!([
            {
                "id": 1,
                "name": {"en": "T-shirt", "es": "Remera"},
                "retail_price": "20.00",
                "wholesale_price": "15.00",
                "variants": [
                    {"name": "size", "label": {"en": "Size", "es": "Talle"}, "options": ["S", "M"]}
                ]
            },
            {
                "id": 2,
                "name": "Sticker",
                "retail_price": "2.50",
                "active": false
            }
        ]))
        .unwrap()
    }

    fn cart() -> Cart {
        let products = products();
        let mut cart = Cart::new();
        cart.add(
            ProductId::new(1),
            &products[0].variants,
            VariantSelection::new().with("size", "M"),
            2,
        )
        .unwrap();
        cart.add(ProductId::new(2), &products[1].variants, VariantSelection::new(), 4)
            .unwrap();
        cart
    }

    #[test]
    fn test_order_items_use_pricing_tier_and_language() {
        let items = order_items(
            &cart(),
            &products(),
            UserType::Wholesale,
            CurrencyCode::USD,
            Language::Es,
            Language::En,
        );

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Remera");
        assert_eq!(items[0].variant_label, "Talle: M");
        assert_eq!(items[0].unit_price, Decimal::new(1500, 2));
        assert_eq!(items[0].line_total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_order_items_skip_unknown_products() {
        let items = order_items(
            &cart(),
            &[],
            UserType::Retail,
            CurrencyCode::USD,
            Language::En,
            Language::En,
        );
        assert!(items.is_empty());
    }
}

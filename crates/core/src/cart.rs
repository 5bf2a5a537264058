//! The locally-owned shopping cart.
//!
//! The cart only remembers what the customer picked: product reference,
//! quantity and variant selection. Names and prices are looked up from the
//! backend when the cart is rendered, so a price change is reflected
//! immediately.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, VariantError, VariantSchema, VariantSelection};

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("invalid variant: {0}")]
    Variant(#[from] VariantError),
    #[error("quantity cannot exceed {MAX_LINE_QUANTITY}")]
    QuantityTooLarge,
    #[error("cart line not found: {0}")]
    LineNotFound(String),
}

/// One product configuration in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub variant: VariantSelection,
}

impl CartLine {
    /// Stable key identifying the line in forms: `"12"` or `"12|color=Red;size=M"`.
    #[must_use]
    pub fn key(&self) -> String {
        if self.variant.is_empty() {
            self.product_id.to_string()
        } else {
            format!("{}|{}", self.product_id, self.variant.canonical())
        }
    }

    fn matches(&self, product_id: ProductId, variant: &VariantSelection) -> bool {
        self.product_id == product_id && &self.variant == variant
    }
}

/// Session-scoped cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Add `quantity` units of a product configuration.
    ///
    /// A line with the same product and selection is topped up instead of
    /// duplicated. Adding zero units changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Variant`] if the selection does not fit `schema`,
    /// and [`CartError::QuantityTooLarge`] if the line would exceed
    /// [`MAX_LINE_QUANTITY`].
    pub fn add(
        &mut self,
        product_id: ProductId,
        schema: &VariantSchema,
        variant: VariantSelection,
        quantity: u32,
    ) -> Result<(), CartError> {
        schema.validate(&variant)?;

        if quantity == 0 {
            return Ok(());
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, &variant))
        {
            let total = line
                .quantity
                .checked_add(quantity)
                .filter(|total| *total <= MAX_LINE_QUANTITY)
                .ok_or(CartError::QuantityTooLarge)?;
            line.quantity = total;
            return Ok(());
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge);
        }

        self.lines.push(CartLine {
            product_id,
            quantity,
            variant,
        });
        Ok(())
    }

    /// Set the quantity of a line; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown key and
    /// [`CartError::QuantityTooLarge`] above [`MAX_LINE_QUANTITY`].
    pub fn set_quantity(&mut self, line_key: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(line_key);
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.key() == line_key)
            .ok_or_else(|| CartError::LineNotFound(line_key.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown key.
    pub fn remove(&mut self, line_key: &str) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|line| line.key() != line_key);
        if self.lines.len() == before {
            return Err(CartError::LineNotFound(line_key.to_string()));
        }
        Ok(())
    }

    /// Drop lines whose product no longer exists.
    pub fn retain_products(&mut self, known: &[ProductId]) {
        self.lines.retain(|line| known.contains(&line.product_id));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.quantity))
    }

    /// True when the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct product IDs referenced by the cart.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.lines.iter().map(|line| line.product_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

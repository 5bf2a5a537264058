//! Product queries.

use tracing::instrument;
use vitrine_core::ProductId;

use crate::backend::{BackendClient, BackendError, Direction, Query};
use crate::models::Product;

const TABLE: &str = "products";

/// Read access to the `products` table.
pub struct ProductService<'a> {
    backend: &'a BackendClient,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Active products, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, BackendError> {
        let mut query = Query::new().eq("active", true);
        if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
            query = query.eq("category", category.trim());
        }
        let query = query.order("id", Direction::Asc);

        self.backend.select(TABLE, &query, None).await
    }

    /// Get a product by ID.
    ///
    /// Inactive products are still returned so existing cart lines and old
    /// orders can show them.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no such product exists.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Product, BackendError> {
        self.backend
            .select_first(TABLE, &Query::new().eq("id", id), None)
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("product {id}")))
    }

    /// Get several products at once. Unknown IDs are simply absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, BackendError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new().is_in("id", ids.iter().copied());
        self.backend.select(TABLE, &query, None).await
    }
}

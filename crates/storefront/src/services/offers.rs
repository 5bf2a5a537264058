//! Offer queries.

use chrono::{DateTime, Utc};
use tracing::instrument;
use vitrine_core::OfferId;

use crate::backend::{BackendClient, BackendError, Direction, Query};
use crate::models::Offer;

const TABLE: &str = "offers";

/// Read access to the `offers` table.
pub struct OfferService<'a> {
    backend: &'a BackendClient,
}

impl<'a> OfferService<'a> {
    /// Create a new offer service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Active offers ordered by `position`, limited to those running at `now`.
    ///
    /// The offers feed polls this; overlapping polls share one backend request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Offer>, BackendError> {
        let query = Query::new()
            .eq("active", true)
            .order("position", Direction::Asc)
            .order("id", Direction::Asc);

        let offers: Vec<Offer> = self
            .backend
            .select_deduplicated("public", TABLE, &query, None)
            .await?;

        Ok(offers.into_iter().filter(|offer| offer.is_live(now)).collect())
    }

    /// Get an offer by ID.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no such offer exists.
    #[instrument(skip(self), fields(offer_id = %id))]
    pub async fn get(&self, id: OfferId) -> Result<Offer, BackendError> {
        self.backend
            .select_first(TABLE, &Query::new().eq("id", id), None)
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("offer {id}")))
    }
}

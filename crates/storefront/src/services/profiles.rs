//! User profiles (`profiles` table).

use tracing::{debug, instrument};
use vitrine_core::{UserId, UserType};

use crate::backend::{BackendClient, BackendError, Query};
use crate::models::Profile;

const TABLE: &str = "profiles";

/// Read access to the `profiles` table.
pub struct ProfileService<'a> {
    backend: &'a BackendClient,
}

impl<'a> ProfileService<'a> {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Profile row of `user_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self, access_token), fields(user_id = %user_id))]
    pub async fn get(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<Option<Profile>, BackendError> {
        let query = Query::new().eq("id", user_id);
        self.backend
            .select_first(TABLE, &query, Some(access_token))
            .await
    }

    /// Pricing tier of `user_id`; retail when the user has no profile row.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn get_user_type(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<UserType, BackendError> {
        let profile = self.get(access_token, user_id).await?;
        if profile.is_none() {
            debug!(user_id = %user_id, "No profile row, using retail pricing");
        }
        Ok(profile.map_or(UserType::Retail, |p| p.user_type))
    }
}

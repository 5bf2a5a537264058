//! Account self-service.

use tracing::{info, instrument, warn};

use crate::backend::{BackendClient, BackendError};

/// Backend function that deletes the calling user and their rows.
const DELETE_USER_RPC: &str = "delete_user";

/// Account operations on behalf of the signed-in user.
pub struct AccountService<'a> {
    backend: &'a BackendClient,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient) -> Self {
        Self { backend }
    }

    /// Delete the account behind `access_token`.
    ///
    /// The backend function identifies the user from the token. Signing out
    /// afterwards is best-effort, since the session may already be gone with
    /// the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion call fails.
    #[instrument(skip_all)]
    pub async fn delete_account(&self, access_token: &str) -> Result<(), BackendError> {
        self.backend
            .rpc(DELETE_USER_RPC, &serde_json::json!({}), Some(access_token))
            .await?;
        info!("Account deleted");

        if let Err(e) = self.backend.sign_out(access_token).await {
            warn!(error = %e, "Sign-out after account deletion failed");
        }
        Ok(())
    }
}

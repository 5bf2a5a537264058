//! Session-related types.
//!
//! Sessions live in the in-memory store, so everything here is discarded when
//! the session expires or the process restarts.

use serde::{Deserialize, Serialize};

use vitrine_core::{Email, UserId, UserType};

/// Session-stored user identity.
///
/// Holds the backend access token so user-scoped queries pass row-level
/// security.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Auth service user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Name from sign-up metadata, if given.
    pub full_name: Option<String>,
    /// Pricing tier from the user's profile row.
    pub user_type: UserType,
    /// Backend access token.
    pub access_token: String,
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CurrentUser {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or_else(|| self.email.as_str())
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's chosen language.
    pub const LANGUAGE: &str = "language";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_access_token() {
        let user = CurrentUser {
            id: "0b5e2b8e-7f1a-4a55-b1a4-1c3f6e9d2a10".parse().unwrap(),
            email: Email::parse("ana@shop.io").unwrap(),
            full_name: None,
            user_type: UserType::Wholesale,
            access_token: "very-secret-jwt".to_string(),
        };
        let debug = format!("{user:?}");
        assert!(!debug.contains("very-secret-jwt"));
        assert_eq!(user.display_name(), "ana@shop.io");
    }
}

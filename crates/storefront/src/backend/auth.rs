//! Auth service endpoints (`/auth/v1`).
//!
//! Password sign-in, sign-up, sign-out and user lookup. Tokens returned here
//! are passed back to the REST tables so row-level security applies.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::{Email, UserId};

use super::{BackendClient, BackendError};

/// A signed-in session issued by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token` in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// User record as returned by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Full name stored in the sign-up metadata.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata
            .get("full_name")
            .and_then(serde_json::Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }
}

/// Result of a sign-up request.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The project auto-confirms accounts; the user is signed in.
    SignedIn(AuthSession),
    /// A confirmation email was sent; the user must confirm before signing in.
    ConfirmationRequired(AuthUser),
}

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: serde_json::Value,
}

impl BackendClient {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCredentials`] when the pair is rejected,
    /// or another error if the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, BackendError> {
        let request = self
            .request(Method::POST, &self.auth_endpoint("token"), None)
            .query(&[("grant_type", "password")])
            .json(&PasswordCredentials {
                email: email.as_str(),
                password: password.expose_secret(),
            });

        match self.send(request).await {
            Ok(response) => Ok(response.json().await?),
            Err(BackendError::Api { status: 400, .. } | BackendError::Unauthorized(_)) => {
                Err(BackendError::InvalidCredentials)
            }
            Err(e) => Err(e),
        }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Conflict`] when the email is already registered
    /// (if the project reports it), or another error if the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
        full_name: Option<&str>,
    ) -> Result<SignUpOutcome, BackendError> {
        let data = full_name.map_or_else(
            || serde_json::json!({}),
            |name| serde_json::json!({ "full_name": name }),
        );

        let request = self
            .request(Method::POST, &self.auth_endpoint("signup"), None)
            .json(&SignUpRequest {
                email: email.as_str(),
                password: password.expose_secret(),
                data,
            });

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(BackendError::Api { status: 422, message, .. }) => {
                return Err(BackendError::Conflict(message));
            }
            Err(e) => return Err(e),
        };

        parse_sign_up(response.json().await?)
    }

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let request = self.request(
            Method::POST,
            &self.auth_endpoint("logout"),
            Some(access_token),
        );
        self.send(request).await.map(|_| ())
    }

    /// Look up the user behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] for an invalid or expired token.
    #[instrument(skip_all)]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let request = self.request(Method::GET, &self.auth_endpoint("user"), Some(access_token));
        Ok(self.send(request).await?.json().await?)
    }
}

/// Sign-up answers with a session when accounts are auto-confirmed and with
/// the bare user otherwise.
fn parse_sign_up(value: serde_json::Value) -> Result<SignUpOutcome, BackendError> {
    if value.get("access_token").is_some() {
        return Ok(SignUpOutcome::SignedIn(serde_json::from_value(value)?));
    }

    let user = match value.get("user") {
        Some(user) if user.is_object() => serde_json::from_value(user.clone())?,
        _ => serde_json::from_value(value)?,
    };
    Ok(SignUpOutcome::ConfirmationRequired(user))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const USER_ID: &str = "0b5e2b8e-7f1a-4a55-b1a4-1c3f6e9d2a10";

    #[test]
    fn sign_up_with_session_is_signed_in() {
        let value = serde_json::json!({
            "access_token": "jwt",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "user": { "id": USER_ID, "email": "ana@shop.io" }
        });
        match parse_sign_up(value).unwrap() {
            SignUpOutcome::SignedIn(session) => {
                assert_eq!(session.access_token, "jwt");
                assert_eq!(session.user.id.to_string(), USER_ID);
            }
            SignUpOutcome::ConfirmationRequired(_) => panic!("expected session"),
        }
    }

    #[test]
    fn sign_up_without_session_requires_confirmation() {
        let value = serde_json::json!({
            "id": USER_ID,
            "email": "ana@shop.io",
            "user_metadata": { "full_name": "Ana Souza" }
        });
        match parse_sign_up(value).unwrap() {
            SignUpOutcome::ConfirmationRequired(user) => {
                assert_eq!(user.full_name(), Some("Ana Souza"));
            }
            SignUpOutcome::SignedIn(_) => panic!("expected confirmation"),
        }
    }
}

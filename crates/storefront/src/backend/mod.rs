//! Client for the hosted database-as-a-service backend.
//!
//! # Architecture
//!
//! - REST tables under `{BACKEND_URL}/rest/v1/{table}` and RPC functions under
//!   `/rest/v1/rpc/{function}`
//! - Auth service under `{BACKEND_URL}/auth/v1` (see [`auth`])
//! - The backend is the source of truth; every call is a direct pass-through
//! - Polled list queries are de-duplicated with `moka` so overlapping
//!   refetches share one request
//!
//! Every request carries the brand's anon key as `apikey`. The bearer token
//! is the signed-in user's access token when one is given, otherwise the anon
//! key, so row-level security on the backend decides what is visible.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_storefront::backend::{BackendClient, Direction, Query};
//!
//! let client = BackendClient::new(&config.backend, config.refetch_interval)?;
//! let offers: Vec<Offer> = client
//!     .select("offers", &Query::new().eq("active", true).order("position", Direction::Asc), None)
//!     .await?;
//! ```

pub mod auth;
mod query;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::BackendConfig;

pub use auth::{AuthSession, AuthUser, SignUpOutcome};
pub use query::{Direction, Query};

/// Postgres error code for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Row not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token missing, expired, or not allowed to see the resource.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Email/password pair rejected by the auth service.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Write rejected by a uniqueness constraint.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Error from a de-duplicated request, shared by every waiter.
    #[error("{0}")]
    Shared(Arc<BackendError>),
}

/// Error body shapes returned by the REST and auth services.
#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> String {
        self.error_code
            .clone()
            .or_else(|| {
                self.code.as_ref().map(|code| match code {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            })
            .or_else(|| self.error.clone())
            .unwrap_or_default()
    }

    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
    }
}

/// Client for the backend REST and auth APIs.
///
/// Cheaply cloneable; all clones share the connection pool and refetch cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    rest_url: String,
    auth_url: String,
    anon_key: SecretString,
    refetch_cache: Cache<String, serde_json::Value>,
}

impl BackendClient {
    /// Create a backend client.
    ///
    /// `refetch_interval` is how long a polled query result is shared between
    /// overlapping callers.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig, refetch_interval: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("vitrine-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base = config.url.as_str().trim_end_matches('/');

        let refetch_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(refetch_interval)
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                rest_url: format!("{base}/rest/v1"),
                auth_url: format!("{base}/auth/v1"),
                anon_key: config.anon_key.clone(),
                refetch_cache,
            }),
        })
    }

    /// Build a request with the `apikey` and bearer headers.
    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let anon_key = self.inner.anon_key.expose_secret();
        self.inner
            .client
            .request(method, url)
            .header("apikey", anon_key)
            .bearer_auth(token.unwrap_or(anon_key))
    }

    /// Send a request and turn non-success statuses into [`BackendError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let text = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &text))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.inner.rest_url)
    }

    fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.auth_url)
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Fetch rows as raw JSON.
    async fn select_value(
        &self,
        table: &str,
        query: &Query,
        token: Option<&str>,
    ) -> Result<serde_json::Value, BackendError> {
        let request = self
            .request(Method::GET, &self.table_url(table), token)
            .query(query.params());
        let response = self.send(request).await?;
        Ok(response.json::<serde_json::Value>().await?)
    }

    /// Fetch rows from a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or rows don't match `T`.
    #[instrument(skip(self, query, token), fields(table = %table))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        token: Option<&str>,
    ) -> Result<Vec<T>, BackendError> {
        let value = self.select_value(table, query, token).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the first matching row, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the row doesn't match `T`.
    pub async fn select_first<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        token: Option<&str>,
    ) -> Result<Option<T>, BackendError> {
        let rows: Vec<T> = self.select(table, &query.clone().limit(1), token).await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch rows for a polled fragment.
    ///
    /// Concurrent callers with the same `scope` and query share a single
    /// request, and the result is reused until the refetch interval elapses.
    /// `scope` must distinguish callers that see different rows (e.g. the
    /// user ID for user-scoped tables).
    ///
    /// # Errors
    ///
    /// Returns an error if the shared request fails or rows don't match `T`.
    #[instrument(skip(self, query, token), fields(table = %table, scope = %scope))]
    pub async fn select_deduplicated<T: DeserializeOwned>(
        &self,
        scope: &str,
        table: &str,
        query: &Query,
        token: Option<&str>,
    ) -> Result<Vec<T>, BackendError> {
        let key = format!("{scope}:{}", query.cache_key(table));
        let value = self
            .inner
            .refetch_cache
            .try_get_with(key, async {
                debug!("Refetching");
                self.select_value(table, query, token).await
            })
            .await
            .map_err(BackendError::Shared)?;

        Ok(serde_json::from_value(value)?)
    }

    /// Insert one row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Conflict`] on a uniqueness violation, or another
    /// error if the request fails.
    #[instrument(skip(self, row, token), fields(table = %table))]
    pub async fn insert<B, T>(&self, table: &str, row: &B, token: Option<&str>) -> Result<T, BackendError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, &self.table_url(table), token)
            .header("Prefer", "return=representation")
            .json(row);
        let response = self.send(request).await?;

        let rows: Vec<T> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("{table}: insert returned no row")))
    }

    /// Call a backend function.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, args, token), fields(function = %function))]
    pub async fn rpc<A: Serialize + Sync>(
        &self,
        function: &str,
        args: &A,
        token: Option<&str>,
    ) -> Result<serde_json::Value, BackendError> {
        let url = format!("{}/rpc/{function}", self.inner.rest_url);
        let request = self.request(Method::POST, &url, token).json(args);
        let response = self.send(request).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Check that the backend answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the key.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let query = Query::new().select("key").limit(1);
        self.select_value("settings", &query, None).await.map(|_| ())
    }
}

/// Map an error status and body to a [`BackendError`].
fn error_from_response(status: StatusCode, body: &str) -> BackendError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code();
    let message = parsed
        .message()
        .unwrap_or_else(|| body.chars().take(200).collect());

    tracing::debug!(status = %status, code = %code, message = %message, "Backend error response");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(message),
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        StatusCode::CONFLICT => BackendError::Conflict(message),
        _ if code == UNIQUE_VIOLATION => BackendError::Conflict(message),
        _ => BackendError::Api {
            status: status.as_u16(),
            code,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_error_body_is_parsed() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"code":"PGRST100","message":"failed to parse filter","details":null,"hint":null}"#,
        );
        assert_eq!(
            err.to_string(),
            "API error: 400 PGRST100 - failed to parse filter"
        );
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = error_from_response(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        );
        assert!(matches!(err, BackendError::Conflict(_)));
    }

    #[test]
    fn test_auth_error_body_is_parsed() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        match err {
            BackendError::Api { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, "invalid_grant");
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let err = error_from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"code":"PGRST301","message":"JWT expired"}"#,
        );
        assert_eq!(err.to_string(), "Unauthorized: JWT expired");
    }

    #[test]
    fn test_non_json_body_is_truncated_into_message() {
        let body = "x".repeat(500);
        let err = error_from_response(StatusCode::BAD_GATEWAY, &body);
        match err {
            BackendError::Api { message, .. } => assert_eq!(message.len(), 200),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rate_limited_error() {
        let err = BackendError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}

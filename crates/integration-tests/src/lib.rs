//! Integration tests for a running Vitrine storefront.
//!
//! These talk to a real server over HTTP, which in turn talks to a real
//! backend project, so they are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront for a brand with a seeded backend
//! vt-cli brand select acme
//! cargo run -p vitrine-storefront
//!
//! # In another shell
//! STOREFRONT_BASE_URL=http://localhost:3000 cargo test -p vitrine-integration-tests -- --ignored
//! ```
//!
//! Sign-in tests additionally need `TEST_USER_EMAIL` and `TEST_USER_PASSWORD`
//! for a confirmed account.

use std::time::Duration;

use reqwest::Client;

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Credentials of a confirmed test account, if configured.
#[must_use]
pub fn test_user() -> Option<(String, String)> {
    let email = std::env::var("TEST_USER_EMAIL").ok()?;
    let password = std::env::var("TEST_USER_PASSWORD").ok()?;
    Some((email, password))
}

/// Browser-like client: keeps the session cookie, does not follow redirects.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to build.
pub fn browser() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(20))
        .build()
}

//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (announcement, live offers, products)
//! GET  /health                   - Liveness
//! GET  /health/ready             - Backend reachability
//!
//! # Catalog
//! GET  /products[?category=]     - Product listing (prices per user type)
//! GET  /products/{id}            - Product detail with variant picker
//! GET  /offers                   - Offers page
//! GET  /offers/feed              - Offers fragment (polled)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                     - Cart page
//! POST /cart/add                 - Add line (returns count badge, triggers cart-updated)
//! POST /cart/update              - Set quantity (returns cart_items fragment)
//! POST /cart/remove              - Remove line (returns cart_items fragment)
//! GET  /cart/count               - Cart count badge (fragment)
//! POST /cart/checkout            - Place order (auth), redirect to order
//!
//! # Orders (requires auth)
//! GET  /orders                   - Order history
//! GET  /orders/{number}          - Order detail
//! GET  /orders/{number}/status   - Status fragment (polled)
//!
//! # Store
//! GET  /contact                  - Contact details
//! POST /language                 - Switch language (stored in session)
//!
//! # Auth
//! GET  /auth/login               - Login page
//! POST /auth/login               - Login action
//! GET  /auth/register            - Register page
//! POST /auth/register            - Register action
//! POST /auth/logout              - Logout action
//!
//! # Account (requires auth)
//! GET  /account                  - Account overview
//! GET  /account/delete           - Deletion confirmation
//! POST /account/delete           - Delete account, clear session
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod contact;
pub mod health;
pub mod home;
pub mod language;
pub mod layout;
pub mod offers;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
///
/// Form submissions are rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/logout", post(auth::logout))
        .merge(limited)
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the offer routes router.
pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(offers::index))
        .route("/feed", get(offers::feed))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
        .layer(api_rate_limiter());

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(mutations)
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{number}", get(orders::show))
        .route("/{number}/status", get(orders::status))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/delete", get(account::delete_page).post(account::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/offers", offer_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .route("/contact", get(contact::show))
        .route("/language", post(language::switch))
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
}

//! Service wrappers over the backend tables.
//!
//! Each service borrows the shared [`BackendClient`](crate::backend::BackendClient)
//! and exposes the handful of queries the pages need. They add no caching,
//! retries or consistency logic of their own; the backend is the source of
//! truth and every call is a pass-through.
//!
//! # Services
//!
//! - `offers` - Live offers, polled by the offers feed
//! - `products` - Catalog listing and lookup
//! - `settings` - Key/value store settings (errors become `None`)
//! - `contact` - Store contact details and `WhatsApp` links
//! - `orders` - Order numbering, checkout and history
//! - `profiles` - Pricing tier of a signed-in user
//! - `account` - Account deletion

pub mod account;
pub mod contact;
pub mod offers;
pub mod orders;
pub mod products;
pub mod profiles;
pub mod settings;

pub use account::AccountService;
pub use contact::{ContactService, whatsapp_url};
pub use offers::OfferService;
pub use orders::{CheckoutError, OrderService, order_items};
pub use products::ProductService;
pub use profiles::ProfileService;
pub use settings::SettingsService;

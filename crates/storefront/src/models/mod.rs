//! Domain models for storefront.
//!
//! Row types mirror the backend tables; the storefront never owns them and
//! re-reads them per request. Session types are the only locally-held state.

use serde::Deserialize;

pub mod catalog;
pub mod contact;
pub mod order;
pub mod session;

pub use catalog::{Offer, Product};
pub use contact::{ContactInfo, Profile, Setting};
pub use order::{NewOrder, Order, OrderItem};
pub use session::{CurrentUser, keys as session_keys};

/// JSON columns may be `null`; read that as the empty value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod locale;
pub mod price;
pub mod status;
pub mod variant;

pub use email::{Email, EmailError};
pub use id::*;
pub use locale::{Language, LocalizedText};
pub use price::{CurrencyCode, Price, UnknownCurrency, UserType, select_price};
pub use status::OrderStatus;
pub use variant::{VariantAttribute, VariantError, VariantSchema, VariantSelection};

//! Vitrine Core - Shared domain types.
//!
//! This crate provides the types used across all Vitrine components:
//! - `storefront` - Brand storefront served over HTTP
//! - `cli` - Brand selection and debug tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Everything authoritative lives in the hosted backend; the only
//! state owned here is the shopping [`cart::Cart`].
//!
//! # Modules
//!
//! - [`types`] - IDs, prices and price selection, languages, variants, statuses
//! - [`cart`] - Session-scoped shopping cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartLine, MAX_LINE_QUANTITY};
pub use types::*;

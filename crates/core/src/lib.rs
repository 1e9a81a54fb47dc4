//! Synergy Core - Shared types library.
//!
//! This crate provides common types used across all Synergy Mobiles
//! components:
//! - `storefront` - Cart, checkout, and remote API client library
//! - `cli` - Command-line driver for browsing and ordering
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   payment/order enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Synergy Mobiles storefront core library.
//!
//! This crate holds the stateful heart of the storefront: the shopping cart,
//! the checkout wizard, the persistent store adapter, and the remote
//! catalog/order API client. UI layers (web or CLI) consume the [`shop::Shop`]
//! state container and render whatever it reports.
//!
//! # Architecture
//!
//! - [`cart`] - in-memory cart keyed by product identity, persisted on every
//!   mutation
//! - [`checkout`] - finite-state checkout wizard (shipping → payment →
//!   confirmation → success)
//! - [`store`] - best-effort key/value persistence; malformed state degrades
//!   to defaults
//! - [`api`] - `reqwest`-based REST client with normalized failures
//! - [`session`] - bearer credential, profile, and order history
//! - [`shop`] - the single state container wiring all of the above together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod content;
pub mod error;
pub mod session;
pub mod shop;
pub mod store;
pub mod whatsapp;

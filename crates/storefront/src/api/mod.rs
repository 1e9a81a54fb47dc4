//! Remote catalog/order API client.
//!
//! # Architecture
//!
//! - `reqwest` JSON REST against the backend (`/products`, `/users`,
//!   `/orders`, `/upload`)
//! - Bearer credential attached when one is held; 401/403 normalize to
//!   [`ApiError::Unauthorized`] so callers can force a local logout
//! - Product listings cached in-memory via `moka` (5-minute TTL); cart and
//!   order calls are never cached
//!
//! Failures never escape this boundary as panics or raw transport errors:
//! every operation returns the parsed payload or a normalized [`ApiError`]
//! whose display text is safe to show the user.

mod client;
pub mod types;

pub use client::ApiClient;

use thiserror::Error;

/// Errors from backend API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the response not received.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("unexpected response from server: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend rejected the request; carries the server's own message.
    #[error("{message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Server-provided `message`, or a generic fallback.
        message: String,
    },

    /// Held credential was rejected (expired or invalid token).
    #[error("session expired, please sign in again")]
    Unauthorized,

    /// Operation needs a credential but none is held.
    #[error("not signed in")]
    NoCredential,
}

impl ApiError {
    /// Whether this failure should trigger a local logout.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NoCredential)
    }
}

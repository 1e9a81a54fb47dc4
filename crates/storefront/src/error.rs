//! Unified error type for the storefront library boundary.
//!
//! Individual modules keep their own error enums; `ShopError` exists so
//! drivers (the CLI, tests) can hold one error type across setup and
//! operations.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Top-level storefront error.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration loading failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persistent store could not be opened.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Backend API operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Checkout validation or transition failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Result type alias for `ShopError`.
pub type Result<T> = std::result::Result<T, ShopError>;

//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SYNERGY_API_URL` - Base URL of the backend REST API (e.g.
//!   `https://shop.example.com/api`)
//!
//! ## Optional
//! - `SYNERGY_WHATSAPP_NUMBER` - Order-desk WhatsApp number in international
//!   format without `+` (default: 923009786786)
//! - `SYNERGY_SHIPPING_PRICE` - Flat shipping rate in rupees (default: 200)
//! - `SYNERGY_STATE_DIR` - Directory for persisted cart/session state
//!   (default: `.synergy`)

use std::path::PathBuf;

use synergy_core::Price;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the backend REST API.
    pub api_url: Url,
    /// WhatsApp number for the order-notification deep-link.
    pub whatsapp_number: String,
    /// Flat shipping rate added to every order.
    pub shipping_price: Price,
    /// Directory holding persisted cart and session state.
    pub state_dir: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_url("SYNERGY_API_URL", &get_required_env("SYNERGY_API_URL")?)?;
        let whatsapp_number = get_env_or_default("SYNERGY_WHATSAPP_NUMBER", "923009786786");
        let shipping_price = parse_shipping_price(&get_env_or_default(
            "SYNERGY_SHIPPING_PRICE",
            DEFAULT_SHIPPING_PRICE,
        ))?;
        let state_dir = PathBuf::from(get_env_or_default("SYNERGY_STATE_DIR", ".synergy"));

        Ok(Self {
            api_url,
            whatsapp_number,
            shipping_price,
            state_dir,
        })
    }
}

const DEFAULT_SHIPPING_PRICE: &str = "200";

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate a URL-valued variable.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the flat shipping rate.
fn parse_shipping_price(value: &str) -> Result<Price, ConfigError> {
    value.parse::<i64>().map(Price::new).map_err(|e| {
        ConfigError::InvalidEnvVar("SYNERGY_SHIPPING_PRICE".to_string(), e.to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_valid() {
        let url = parse_url("TEST", "https://shop.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api");
    }

    #[test]
    fn test_parse_url_invalid() {
        let err = parse_url("TEST", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_shipping_price() {
        assert_eq!(parse_shipping_price("200").unwrap(), Price::new(200));
        assert!(parse_shipping_price("free").is_err());
    }

    #[test]
    fn test_default_shipping_price_parses() {
        assert_eq!(
            parse_shipping_price(DEFAULT_SHIPPING_PRICE).unwrap(),
            Price::new(200)
        );
    }
}

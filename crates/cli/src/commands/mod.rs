//! Command implementations.
//!
//! Every command opens a [`Shop`](synergy_storefront::shop::Shop) from the
//! environment, so state (cart, credential) persists between invocations
//! through the configured state directory.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;

use synergy_storefront::config::StorefrontConfig;
use synergy_storefront::error::ShopError;
use synergy_storefront::shop::Shop;

/// Open a shop over the file-backed store, without touching the network.
pub fn open_shop() -> Result<Shop, ShopError> {
    let config = StorefrontConfig::from_env()?;
    Shop::open(config)
}

/// Open a shop and run its startup fetches (catalog, session refresh).
pub async fn open_shop_online() -> Result<Shop, ShopError> {
    let mut shop = open_shop()?;
    shop.init().await;
    Ok(shop)
}

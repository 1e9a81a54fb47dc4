//! Cart commands.
//!
//! The cart lives in the state directory, so it survives between
//! invocations and is the same cart the `checkout` command submits.
//!
//! # Usage
//!
//! ```bash
//! sm-cli cart add 665f1c2e9b1e8a0012ab34cd -q 2
//! sm-cli cart update 665f1c2e9b1e8a0012ab34cd -- -1
//! sm-cli cart remove 665f1c2e9b1e8a0012ab34cd
//! sm-cli cart show
//! sm-cli cart clear
//! ```

use synergy_core::ProductId;
use synergy_storefront::shop::Shop;

use super::{open_shop, open_shop_online};

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or the id is unknown.
pub async fn add(id: &str, quantity: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop_online().await?;
    let product_id = ProductId::new(id);

    if shop.catalog().get(&product_id).is_none() {
        return Err(format!("no product with id {id}").into());
    }

    shop.add_to_cart(&product_id, quantity);
    print_cart(&shop);
    Ok(())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns an error if the shop cannot be opened.
pub fn remove(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop()?;
    shop.remove_from_cart(&ProductId::new(id));
    print_cart(&shop);
    Ok(())
}

/// Apply a signed quantity delta to a line.
///
/// # Errors
///
/// Returns an error if the shop cannot be opened.
pub fn update(id: &str, delta: i32) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop()?;
    shop.update_quantity(&ProductId::new(id), delta);
    print_cart(&shop);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the shop cannot be opened.
pub fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop()?;
    shop.clear_cart();
    println!("Cart cleared.");
    Ok(())
}

/// Print the cart contents and totals.
///
/// # Errors
///
/// Returns an error if the shop cannot be opened.
pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop()?;
    print_cart(&shop);
    Ok(())
}

fn print_cart(shop: &Shop) {
    let cart = shop.cart();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "{}  {} x {} = {}  ({})",
            line.product_id,
            line.name,
            line.quantity,
            line.line_total(),
            line.unit_price
        );
    }
    println!(
        "{} item(s), subtotal {}",
        cart.item_count(),
        cart.subtotal()
    );
}

//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! sm-cli products
//!
//! # Server-side keyword search
//! sm-cli products -k "galaxy"
//!
//! # Full details for one product
//! sm-cli show 665f1c2e9b1e8a0012ab34cd
//! ```

use synergy_core::ProductId;

use super::open_shop;

/// List products, optionally filtered by a server-side keyword search.
///
/// # Errors
///
/// Returns an error if the backend request fails.
pub async fn list(keyword: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop()?;
    let products = shop.client().fetch_products(keyword).await?;

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &products {
        let mut tags = Vec::new();
        if product.is_featured {
            tags.push("featured");
        }
        if product.is_best_seller {
            tags.push("best seller");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", tags.join(", "))
        };

        println!(
            "{}  {}  {}{}",
            product.id,
            product.effective_price(),
            product.name,
            tags
        );
    }

    Ok(())
}

/// Print full details for one product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn show(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop()?;
    let product = shop.client().fetch_product(&ProductId::new(id)).await?;

    println!("{}", product.name);
    println!("  id:       {}", product.id);
    println!("  brand:    {}", product.brand);
    println!("  category: {}", product.category);
    match product.discount_price {
        Some(discounted) => println!("  price:    {} (was {})", discounted, product.price),
        None => println!("  price:    {}", product.price),
    }
    println!("  stock:    {}", product.stock);
    if !product.features.is_empty() {
        println!("  features:");
        for feature in &product.features {
            println!("    - {feature}");
        }
    }
    if !product.specifications.is_empty() {
        println!("  specifications:");
        for (label, value) in &product.specifications {
            println!("    {label}: {value}");
        }
    }
    if let Some(video) = &product.video_link {
        println!("  video:    {video}");
    }

    Ok(())
}

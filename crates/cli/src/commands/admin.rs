//! Catalog management commands.
//!
//! All of these require a signed-in admin account; the backend enforces
//! the role on every request.
//!
//! # Usage
//!
//! ```bash
//! # Upload images first, then reference the returned URLs in the JSON
//! sm-cli admin upload front.jpg back.jpg
//! sm-cli admin create product.json
//! sm-cli admin update 665f1c2e9b1e8a0012ab34cd product.json
//! sm-cli admin delete 665f1c2e9b1e8a0012ab34cd
//! ```
//!
//! # Product JSON
//!
//! The file uses the backend's wire shape, e.g.:
//!
//! ```json
//! {
//!   "name": "Galaxy S24",
//!   "brand": "Samsung",
//!   "category": "Mobile",
//!   "price": 145000,
//!   "discountPrice": 139000,
//!   "image": "/uploads/front.jpg",
//!   "images": ["/uploads/front.jpg", "/uploads/back.jpg"],
//!   "stock": 12,
//!   "features": ["6.2\" AMOLED", "8 GB RAM"]
//! }
//! ```

use std::path::{Path, PathBuf};

use synergy_core::ProductId;
use synergy_storefront::api::types::ProductInput;

use super::open_shop;

fn read_product_input(file: &Path) -> Result<ProductInput, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Create a product from a JSON description.
///
/// # Errors
///
/// Returns an error if the file is unreadable or the backend rejects it.
pub async fn create(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop()?;
    let input = read_product_input(file)?;

    let created = shop.client().create_product(&input).await?;
    println!("Created {} ({})", created.name, created.id);
    Ok(())
}

/// Update a product from a JSON description.
///
/// # Errors
///
/// Returns an error if the file is unreadable or the backend rejects it.
pub async fn update(id: &str, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop()?;
    let input = read_product_input(file)?;

    let updated = shop
        .client()
        .update_product(&ProductId::new(id), &input)
        .await?;
    println!("Updated {} ({})", updated.name, updated.id);
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the backend rejects the deletion.
pub async fn delete(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop()?;
    shop.client().delete_product(&ProductId::new(id)).await?;
    println!("Deleted {id}.");
    Ok(())
}

/// Upload image files and print the stored URLs in input order.
///
/// # Errors
///
/// Returns an error if a file is unreadable or the upload is rejected.
pub async fn upload(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    if files.is_empty() {
        return Err("no files given".into());
    }

    let shop = open_shop()?;

    let mut parts = Vec::with_capacity(files.len());
    for path in files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("invalid file name: {}", path.display()))?
            .to_owned();
        let bytes = std::fs::read(path)?;
        parts.push((file_name, bytes));
    }

    let urls = shop.client().upload_images(parts).await?;
    for url in urls {
        println!("{url}");
    }
    Ok(())
}

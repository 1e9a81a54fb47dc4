//! Product catalog snapshot.
//!
//! The storefront fetches the full catalog once at startup and consults the
//! in-memory snapshot for cart lookups and keyword search. The backend wire
//! format is camelCase JSON with a Mongo-style `_id`; the snapshot exposes a
//! single [`ProductId`] identity.

use serde::{Deserialize, Serialize};
use synergy_core::{Price, ProductId};

/// One device in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identity. The wire field is `_id`.
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub discount_price: Option<Price>,
    /// Primary listing image.
    pub image: String,
    /// Gallery images.
    #[serde(default)]
    pub images: Vec<String>,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub features: Vec<String>,
    /// Labelled spec sheet entries, e.g. `"Display" -> "6.2\" AMOLED"`.
    #[serde(default)]
    pub specifications: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub video_link: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_best_seller: bool,
}

impl Product {
    /// Price the shopper actually pays: the discount price when one is set.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }
}

/// In-memory catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a fetched product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products in listing order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Whether the catalog has been populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by identity.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Case-insensitive substring search over product names, matching the
    /// backend's keyword filter.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&Product> {
        let keyword = keyword.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&keyword))
            .collect()
    }
}

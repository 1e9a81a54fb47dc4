//! Wire types for the backend REST API.
//!
//! The backend speaks camelCase JSON with Mongo-style `_id` identities.
//! Request types serialize exactly what the backend expects; response types
//! tolerate missing optional fields so older records still parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use synergy_core::{OrderId, OrderStatus, PaymentMethod, Price, ProductId, UserId};

// =============================================================================
// Auth
// =============================================================================

/// Login request body.
#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Signup request body.
#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful login/signup payload: profile plus bearer token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub token: String,
}

/// Profile payload from `GET /users/profile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// One ordered line inside an order snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub image: String,
    pub price: Price,
    /// Product identity; the wire field is `product`.
    #[serde(rename = "product")]
    pub product_id: ProductId,
}

/// Shipping address captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    pub phone: String,
}

/// Order submission body for `POST /orders`.
///
/// Totals are computed client-side from the cart snapshot; the backend
/// re-derives and validates them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: Price,
    pub shipping_price: Price,
    pub tax_price: Price,
    pub total_price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// A placed order as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub items_price: Price,
    #[serde(default)]
    pub shipping_price: Price,
    #[serde(default)]
    pub total_price: Price,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Admin catalog management
// =============================================================================

/// Product create/update body for the admin CRUD endpoints.
///
/// Only `name` and `price` are required when parsed from a file; everything
/// else defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: std::collections::BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_best_seller: bool,
}

/// Error body the backend returns on failures: `{"message": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

//! Shopping cart state machine.
//!
//! The cart is an ordered collection of lines keyed by product identity:
//! product id is the sole key, so "one line per product" is structural
//! rather than enforced by a separate check. Duplicate adds merge into the
//! existing line.
//!
//! Quantity semantics are deliberate: decrementing floors at 1 and never
//! removes a line. Reducing and deleting are distinct user intents, and
//! deletion is only ever the explicit [`Cart::remove`] operation.
//!
//! Derived values (`item_count`, `subtotal`) are recomputed on every read.

use serde::{Deserialize, Serialize};
use synergy_core::{Price, ProductId};

use crate::catalog::Product;
use crate::store::{self, StateStore, keys};

/// One product-quantity pairing held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the line was created.
    pub unit_price: Price,
    /// Always at least 1.
    pub quantity: u32,
    /// Primary image for cart display.
    pub image: String,
}

impl CartLine {
    /// Total for this line (`unit_price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Ordered collection of cart lines, owned by the active session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Load the persisted cart, or an empty cart when nothing usable is
    /// stored.
    #[must_use]
    pub fn load(store: &dyn StateStore) -> Self {
        store::load_or_default(store, keys::CART)
    }

    /// Persist the current cart contents (best-effort).
    pub fn persist(&self, store: &dyn StateStore) {
        store::save(store, keys::CART, self);
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total item count across all lines. Recomputed on every call.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Monetary total across all lines. Recomputed on every call.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` of `product` to the cart.
    ///
    /// If a line for the product already exists its quantity is incremented;
    /// otherwise a new line is appended, capturing the product's current
    /// effective price and primary image.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        self.lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.effective_price(),
            quantity: quantity.max(1),
            image: product.image.clone(),
        });
    }

    /// Remove the line for `product_id`. Absent ids are a no-op.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.lines.retain(|l| &l.product_id != product_id);
    }

    /// Apply a signed quantity delta to the line for `product_id`, floored
    /// at 1. A decrement that would reach 0 or below clamps to 1 — it never
    /// removes the line. Absent ids are a no-op.
    pub fn update_quantity(&mut self, product_id: &ProductId, delta: i32) {
        if let Some(line) = self.line_mut(product_id) {
            let updated = i64::from(line.quantity) + i64::from(delta);
            line.quantity = u32::try_from(updated.max(1)).unwrap_or(u32::MAX);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use crate::store::MemoryStore;

    #[test]
    fn test_duplicate_add_merges_line() {
        let mut cart = Cart::default();
        let a = product("A", "Galaxy S24", 1000);

        cart.add(&a, 1);
        cart.add(&a, 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().unwrap().quantity, 3);
    }

    #[test]
    fn test_one_line_per_product_across_mixed_ops() {
        let mut cart = Cart::default();
        let a = product("A", "Galaxy S24", 1000);
        let b = product("B", "Redmi Note", 500);

        cart.add(&a, 1);
        cart.add(&b, 1);
        cart.update_quantity(&a.id, 4);
        cart.remove(&b.id);
        cart.add(&b, 2);
        cart.add(&a, 1);

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.clone()).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn test_derived_totals() {
        let mut cart = Cart::default();
        cart.add(&product("A", "Galaxy S24", 1000), 2);
        cart.add(&product("B", "Redmi Note", 500), 1);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Price::new(2500));
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut cart = Cart::default();
        let a = product("A", "Galaxy S24", 1000);
        cart.add(&a, 2);

        cart.update_quantity(&a.id, -1);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);

        // Would reach 0; clamps to 1 and keeps the line
        cart.update_quantity(&a.id, -1);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);

        // Large negative delta also clamps
        cart.update_quantity(&a.id, -100);
        assert_eq!(cart.lines().first().unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::default();
        cart.add(&product("A", "Galaxy S24", 1000), 1);

        let before = cart.clone();
        cart.remove(&ProductId::new("missing"));
        cart.update_quantity(&ProductId::new("missing"), 5);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_discounted_product_uses_effective_price() {
        let mut p = product("A", "Galaxy S24", 1000);
        p.discount_price = Some(Price::new(800));

        let mut cart = Cart::default();
        cart.add(&p, 2);
        assert_eq!(cart.subtotal(), Price::new(1600));
    }

    #[test]
    fn test_persist_reload_round_trip() {
        let store = MemoryStore::new();
        let mut cart = Cart::default();
        cart.add(&product("A", "Galaxy S24", 1000), 2);
        cart.persist(&store);

        let reloaded = Cart::load(&store);
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn test_load_from_corrupted_store_is_empty() {
        use crate::store::{StateStore, keys};

        let store = MemoryStore::new();
        store.put(keys::CART, "<<definitely not json>>").unwrap();

        let cart = Cart::load(&store);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_persists_empty_state() {
        let store = MemoryStore::new();
        let mut cart = Cart::default();
        cart.add(&product("A", "Galaxy S24", 1000), 1);
        cart.persist(&store);

        cart.clear();
        cart.persist(&store);

        assert!(Cart::load(&store).is_empty());
    }
}

//! Cart ledger.
//!
//! An ordered list of (product, quantity) entries, one per product id, in
//! the order products were first added. Every mutation rewrites the whole
//! snapshot under [`keys::CART`]; reads never touch storage.

use std::sync::Arc;

use quickcart_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::storage::{KeyValueStore, StorageError, keys, load_snapshot_or_default, save_snapshot};

/// One line of the ledger.
///
/// `product` is a copy taken when the line was created, so later catalog
/// changes do not alter carts already built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: ProductId,
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartEntry {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The shopper's cart.
pub struct CartLedger {
    entries: Vec<CartEntry>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CartLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartLedger")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl CartLedger {
    /// Restore the ledger from its persisted snapshot (empty if none).
    ///
    /// Entries with a zero quantity or a repeated product id in a hand-edited
    /// snapshot are dropped so the ledger invariants hold from the start.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let saved: Vec<CartEntry> = load_snapshot_or_default(store.as_ref(), keys::CART)?;

        let mut entries: Vec<CartEntry> = Vec::with_capacity(saved.len());
        for entry in saved {
            if entry.quantity > 0 && !entries.iter().any(|e| e.id == entry.id) {
                entries.push(entry);
            }
        }

        Ok(Self { entries, store })
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// A zero quantity changes nothing. There is no upper bound.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), StorageError> {
        if quantity == 0 {
            return Ok(());
        }

        if let Some(entry) = self.entry_mut(product.id.as_str()) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.entries.push(CartEntry {
                id: product.id.clone(),
                product: product.clone(),
                quantity,
            });
        }
        tracing::debug!(product_id = %product.id, quantity, "Added to cart");
        self.persist()
    }

    /// Take one unit off a line, deleting the line when it reaches zero.
    ///
    /// Unknown product ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    pub fn remove(&mut self, product_id: &str) -> Result<(), StorageError> {
        if let Some(entry) = self.entry_mut(product_id) {
            if entry.quantity > 1 {
                entry.quantity -= 1;
            } else {
                self.entries.retain(|e| e.id.as_str() != product_id);
            }
        }
        tracing::debug!(%product_id, "Removed one from cart");
        self.persist()
    }

    /// Set a line's quantity exactly; zero or below deletes the line.
    ///
    /// Setting a positive quantity for a product not in the cart changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), StorageError> {
        if quantity <= 0 {
            self.entries.retain(|e| e.id.as_str() != product_id);
        } else if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        tracing::debug!(%product_id, quantity, "Set cart quantity");
        self.persist()
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        tracing::debug!("Cart cleared");
        self.persist()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Quantity held for `product_id`, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.id.as_str() == product_id)
            .map_or(0, |e| e.quantity)
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, product_id: &str) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.id.as_str() == product_id)
    }

    fn persist(&self) -> Result<(), StorageError> {
        save_snapshot(self.store.as_ref(), keys::CART, &self.entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::catalog::tests::product;
    use crate::storage::{MemoryStore, load_snapshot};

    fn ledger() -> (CartLedger, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let ledger = CartLedger::load(store.clone()).unwrap();
        (ledger, store)
    }

    fn persisted(store: &MemoryStore) -> Vec<CartEntry> {
        load_snapshot(store, keys::CART).unwrap().unwrap_or_default()
    }

    #[test]
    fn test_add_merges_and_keeps_insertion_order() {
        let (mut cart, _) = ledger();
        let onion = product("p1", 39);
        let milk = product("p4", 30);

        cart.add(&onion, 1).unwrap();
        cart.add(&milk, 2).unwrap();
        cart.add(&onion, 3).unwrap();

        assert_eq!(cart.entries().len(), 2);
        assert_eq!(cart.entries()[0].id.as_str(), "p1");
        assert_eq!(cart.quantity_of("p1"), 4);
        assert_eq!(cart.quantity_of("p4"), 2);
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let (mut cart, _) = ledger();
        cart.add(&product("p1", 39), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_last_unit_deletes_entry() {
        let (mut cart, store) = ledger();
        cart.add(&product("p1", 100), 1).unwrap();

        cart.remove("p1").unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of("p1"), 0);
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut cart, _) = ledger();
        cart.add(&product("p1", 10), 2).unwrap();
        cart.remove("nope").unwrap();
        assert_eq!(cart.quantity_of("p1"), 2);
    }

    #[test]
    fn test_set_quantity() {
        let (mut cart, _) = ledger();
        cart.add(&product("p1", 10), 2).unwrap();

        cart.set_quantity("p1", 7).unwrap();
        assert_eq!(cart.quantity_of("p1"), 7);

        cart.set_quantity("p9", 3).unwrap();
        assert_eq!(cart.quantity_of("p9"), 0);

        cart.set_quantity("p1", -2).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_entries_hold_product_snapshot() {
        let (mut cart, _) = ledger();
        let mut tomato = product("p2", 35);
        cart.add(&tomato, 1).unwrap();

        tomato.price = Decimal::from(99);
        cart.add(&tomato, 1).unwrap();

        // The first snapshot wins; the line is not repriced.
        assert_eq!(cart.subtotal(), Decimal::from(70));
    }

    #[test]
    fn test_every_mutation_persists_and_reloads() {
        let (mut cart, store) = ledger();
        cart.add(&product("p1", 39), 2).unwrap();
        cart.add(&product("p3", 52), 1).unwrap();
        assert_eq!(persisted(&store).len(), 2);

        let reloaded = CartLedger::load(store.clone()).unwrap();
        assert_eq!(reloaded.entries(), cart.entries());
        assert_eq!(reloaded.subtotal(), Decimal::from(130));

        cart.clear().unwrap();
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_load_drops_invalid_snapshot_entries() {
        let store = Arc::new(MemoryStore::new());
        let entry = |id: &str, quantity| CartEntry {
            id: ProductId::new(id),
            product: product(id, 5),
            quantity,
        };
        save_snapshot(
            store.as_ref(),
            keys::CART,
            &vec![entry("a", 0), entry("b", 2), entry("b", 4)],
        )
        .unwrap();

        let cart = CartLedger::load(store).unwrap();
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.quantity_of("b"), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, u32),
        Remove(usize),
        Set(usize, i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..4usize, 0..5u32).prop_map(|(p, q)| Op::Add(p, q)),
            (0..4usize).prop_map(Op::Remove),
            (0..4usize, -3..6i64).prop_map(|(p, q)| Op::Set(p, q)),
        ]
    }

    proptest! {
        #[test]
        fn test_ledger_matches_model(
            prices in proptest::collection::vec(1..500i64, 4),
            ops in proptest::collection::vec(op(), 0..60),
        ) {
            let products: Vec<Product> = prices
                .iter()
                .enumerate()
                .map(|(i, price)| product(&format!("p{i}"), *price))
                .collect();
            let (mut cart, _) = ledger();
            let mut model: HashMap<usize, i64> = HashMap::new();

            for op in ops {
                match op {
                    Op::Add(p, q) => {
                        cart.add(&products[p], q).unwrap();
                        if q > 0 {
                            *model.entry(p).or_insert(0) += i64::from(q);
                        }
                    }
                    Op::Remove(p) => {
                        cart.remove(products[p].id.as_str()).unwrap();
                        if let Some(q) = model.get_mut(&p) {
                            *q -= 1;
                            if *q <= 0 {
                                model.remove(&p);
                            }
                        }
                    }
                    Op::Set(p, q) => {
                        cart.set_quantity(products[p].id.as_str(), q).unwrap();
                        if q <= 0 {
                            model.remove(&p);
                        } else if let Some(existing) = model.get_mut(&p) {
                            *existing = q;
                        }
                    }
                }

                prop_assert!(cart.entries().iter().all(|e| e.quantity >= 1));
            }

            for (i, p) in products.iter().enumerate() {
                let expected = model.get(&i).copied().unwrap_or(0);
                prop_assert_eq!(i64::from(cart.quantity_of(p.id.as_str())), expected);
            }
        }

        #[test]
        fn test_subtotal_is_sum_of_lines(
            lines in proptest::collection::vec((1..1000i64, 1..20u32), 0..12),
        ) {
            let (mut cart, _) = ledger();
            let mut expected = Decimal::ZERO;
            for (i, (price, quantity)) in lines.iter().enumerate() {
                cart.add(&product(&format!("p{i}"), *price), *quantity).unwrap();
                expected += Decimal::from(*price) * Decimal::from(*quantity);
            }
            prop_assert_eq!(cart.subtotal(), expected);
        }
    }
}

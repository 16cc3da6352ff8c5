use std::sync::Arc;

use chakula_core::storage::{KeyValueStore, CART_KEY};
use tracing::warn;

use crate::CartItem;

/// Cart aggregator: holds the line items and mirrors every mutation to
/// durable client-local storage, so the cart survives a reload.
pub struct CartStore {
    items: Vec<CartItem>,
    backend: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Rehydrate from storage. A missing, unreadable or corrupt payload
    /// yields an empty cart rather than an error.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let items = match backend.get(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    warn!("discarding corrupt cart payload: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("cart storage read failed: {err}");
                Vec::new()
            }
        };
        Self { items, backend }
    }

    /// Merge by menu_item_id: an existing line's quantity grows by the given
    /// amount, otherwise the line is appended. Always succeeds.
    pub fn add_item(&mut self, item: CartItem) {
        let quantity = item.quantity.max(1);
        match self.items.iter_mut().find(|line| line.menu_item_id == item.menu_item_id) {
            Some(line) => line.quantity += quantity,
            None => self.items.push(CartItem { quantity, ..item }),
        }
        self.persist();
    }

    /// Deletes the matching line entirely; no-op when absent.
    pub fn remove_item(&mut self, menu_item_id: i64) {
        self.items.retain(|line| line.menu_item_id != menu_item_id);
        self.persist();
    }

    /// Quantity is floor-clamped at 1; the line is never removed implicitly,
    /// however negative the delta.
    pub fn update_quantity(&mut self, menu_item_id: i64, delta: i64) {
        if let Some(line) = self.items.iter_mut().find(|line| line.menu_item_id == menu_item_id) {
            let next = i64::from(line.quantity) + delta;
            line.quantity = next.clamp(1, i64::from(u32::MAX)) as u32;
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recomputed from the lines on every read; nothing is cached.
    pub fn total(&self) -> i64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("cart serialization failed, skipping persist: {err}");
                return;
            }
        };
        if let Err(err) = self.backend.set(CART_KEY, &payload) {
            warn!("cart persistence failed, keeping in-memory state: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chakula_core::storage::{MemoryStore, StorageError};

    fn line(menu_item_id: i64, outlet_id: i64, price: i64, quantity: u32) -> CartItem {
        CartItem {
            menu_item_id,
            name: format!("item-{menu_item_id}"),
            price,
            quantity,
            outlet_id,
            outlet_name: format!("outlet-{outlet_id}"),
        }
    }

    fn empty_cart() -> CartStore {
        CartStore::load(Arc::new(MemoryStore::new()))
    }

    fn assert_invariants(cart: &CartStore) {
        let expected_total: i64 = cart.items().iter().map(|l| l.price * i64::from(l.quantity)).sum();
        let expected_count: u32 = cart.items().iter().map(|l| l.quantity).sum();
        assert_eq!(cart.total(), expected_total);
        assert_eq!(cart.item_count(), expected_count);
    }

    #[test]
    fn test_totals_hold_after_every_mutation() {
        let mut cart = empty_cart();

        cart.add_item(line(1, 10, 450_00, 2));
        assert_invariants(&cart);

        cart.add_item(line(2, 20, 300_00, 1));
        assert_invariants(&cart);

        cart.update_quantity(1, 3);
        assert_invariants(&cart);

        cart.remove_item(2);
        assert_invariants(&cart);

        assert_eq!(cart.total(), 450_00 * 5);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_adding_same_item_merges_into_one_line() {
        let mut cart = empty_cart();
        cart.add_item(line(1, 10, 450_00, 2));
        cart.add_item(line(1, 10, 450_00, 3));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_quantity_never_drops_below_one() {
        let mut cart = empty_cart();
        cart.add_item(line(1, 10, 450_00, 2));

        cart.update_quantity(1, -100);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity(1, i64::MIN + 1);
        assert_eq!(cart.items()[0].quantity, 1);

        // The line survives even when driven to the floor.
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_zero_quantity_add_counts_as_one() {
        let mut cart = empty_cart();
        cart.add_item(line(1, 10, 450_00, 0));
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_remove_missing_item_is_a_noop() {
        let mut cart = empty_cart();
        cart.add_item(line(1, 10, 450_00, 1));
        cart.remove_item(99);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_cart_survives_reload() {
        let backend = Arc::new(MemoryStore::new());

        let mut cart = CartStore::load(backend.clone());
        cart.add_item(line(1, 10, 450_00, 2));
        cart.add_item(line(2, 20, 300_00, 1));
        let before: Vec<CartItem> = cart.items().to_vec();

        let reloaded = CartStore::load(backend);
        assert_eq!(reloaded.items(), before.as_slice());
    }

    #[test]
    fn test_clear_empties_storage_too() {
        let backend = Arc::new(MemoryStore::new());

        let mut cart = CartStore::load(backend.clone());
        cart.add_item(line(1, 10, 450_00, 2));
        cart.clear();

        let reloaded = CartStore::load(backend);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_corrupt_payload_rehydrates_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(CART_KEY, "[{broken").unwrap();

        let cart = CartStore::load(backend);
        assert!(cart.is_empty());
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn test_storage_failure_keeps_in_memory_state() {
        let mut cart = CartStore::load(Arc::new(FailingStore));
        cart.add_item(line(1, 10, 450_00, 2));

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), 900_00);
    }
}

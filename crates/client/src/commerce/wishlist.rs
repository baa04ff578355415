//! Wishlist.

use serde::{Deserialize, Serialize};

use sungrove_core::{Price, Product, ProductId};

use crate::events::{ClientEvent, SharedSink};
use crate::store::{StoreHandle, keys};

use super::cart::load_valid_items;

/// One favorited product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Catalog product ID, present at most once.
    pub product_id: ProductId,
    /// Product name at time of favoriting.
    pub name: String,
    /// Unit price at time of favoriting.
    pub price: Price,
    /// Primary image URL at time of favoriting.
    pub image: Option<String>,
}

impl WishlistEntry {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// Favorites set with write-through persistence.
///
/// Set semantics over the product identity space: a product is present at
/// most once, and toggling twice returns the wishlist to its prior state.
/// Independent of the cart - a product can be in both, neither, or only one.
pub struct WishlistEngine {
    entries: Vec<WishlistEntry>,
    store: StoreHandle,
    events: SharedSink,
}

impl WishlistEngine {
    /// Load the wishlist from the store.
    ///
    /// Entries are deserialized item by item; malformed ones are dropped,
    /// and duplicates (a mangled document) are collapsed to the first
    /// occurrence.
    #[must_use]
    pub fn load(store: StoreHandle, events: SharedSink) -> Self {
        let mut entries: Vec<WishlistEntry> = Vec::new();
        for entry in load_valid_items::<WishlistEntry>(&store, keys::WISHLIST) {
            if !entries.iter().any(|e| e.product_id == entry.product_id) {
                entries.push(entry);
            }
        }

        Self {
            entries,
            store,
            events,
        }
    }

    /// Add `product` if absent, remove it if present.
    ///
    /// Returns `true` when the product is now on the wishlist.
    pub fn toggle(&mut self, product: &Product) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.product_id != product.id);

        let now_present = if self.entries.len() == before {
            self.entries.push(WishlistEntry::from_product(product));
            true
        } else {
            false
        };

        self.persist();
        now_present
    }

    /// Whether `product_id` is on the wishlist.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries
            .iter()
            .any(|entry| &entry.product_id == product_id)
    }

    /// The entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    fn persist(&self) {
        self.store.write_json(keys::WISHLIST, &self.entries);
        self.events.emit(&ClientEvent::WishlistChanged);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use sungrove_core::CurrencyCode;

    use crate::events::NullSink;

    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new("4.50".parse().unwrap(), CurrencyCode::USD),
            image: None,
        }
    }

    fn engine() -> WishlistEngine {
        WishlistEngine::load(StoreHandle::memory(), Arc::new(NullSink))
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut wishlist = engine();

        assert!(wishlist.toggle(&product("1")));
        assert!(wishlist.contains(&ProductId::new("1")));

        assert!(!wishlist.toggle(&product("1")));
        assert!(!wishlist.contains(&ProductId::new("1")));
    }

    #[test]
    fn test_double_toggle_restores_prior_state() {
        let mut wishlist = engine();
        wishlist.toggle(&product("keep"));
        let before: Vec<_> = wishlist.entries().to_vec();

        wishlist.toggle(&product("flip"));
        wishlist.toggle(&product("flip"));

        assert_eq!(wishlist.entries(), before.as_slice());
    }

    #[test]
    fn test_product_present_at_most_once() {
        let store = StoreHandle::memory();
        // mangled document with a duplicate entry
        store.set(
            keys::WISHLIST,
            r#"[
                {"product_id":"1","name":"A","price":{"amount":"1.00","currency_code":"USD"},"image":null},
                {"product_id":"1","name":"A","price":{"amount":"1.00","currency_code":"USD"},"image":null}
            ]"#,
        );

        let wishlist = WishlistEngine::load(store, Arc::new(NullSink));
        assert_eq!(wishlist.entries().len(), 1);
    }

    #[test]
    fn test_survives_reload() {
        let store = StoreHandle::memory();
        let events: crate::events::SharedSink = Arc::new(NullSink);

        let mut wishlist = WishlistEngine::load(store.clone(), Arc::clone(&events));
        wishlist.toggle(&product("1"));
        wishlist.toggle(&product("2"));
        drop(wishlist);

        let reloaded = WishlistEngine::load(store, events);
        assert_eq!(reloaded.entries().len(), 2);
        assert!(reloaded.contains(&ProductId::new("1")));
        assert!(reloaded.contains(&ProductId::new("2")));
    }
}

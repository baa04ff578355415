//! Shopping cart.

use serde::{Deserialize, Serialize};

use sungrove_core::{CurrencyCode, Price, Product, ProductId};

use crate::error::ClientError;
use crate::events::{ClientEvent, SharedSink};
use crate::store::{StoreHandle, keys};

/// One product entry in the cart.
///
/// Display fields and price are frozen at the time of adding: a later
/// catalog change does not alter a line already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product ID, unique across the cart.
    pub product_id: ProductId,
    /// Product name at time of add.
    pub name: String,
    /// Unit price at time of add.
    pub price: Price,
    /// Primary image URL at time of add.
    pub image: Option<String>,
    /// Quantity, always ≥ 1 (reaching 0 removes the line).
    pub quantity: u32,
}

impl LineItem {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.line_total(self.quantity)
    }
}

/// Derived cart totals, recomputed on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of line quantities.
    pub item_count: u32,
    /// Sum of quantity × price over all lines.
    pub subtotal: Price,
}

/// The ordered sequence of line items.
///
/// ## Invariants
///
/// - `product_id` is unique across the sequence; adding an existing product
///   increments its quantity instead of duplicating the entry
/// - every line has quantity ≥ 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from deserialized lines.
    ///
    /// Persisted state is untrusted: zero-quantity lines are dropped and
    /// duplicate product IDs are merged, so the invariants hold even for a
    /// document another process mangled.
    #[must_use]
    pub fn from_lines(lines: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match cart.find_mut(&line.product_id) {
                Some(existing) => existing.quantity += line.quantity,
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Merge-or-append: increments quantity if the product is present,
    /// appends a new line otherwise. Returns the updated line.
    pub fn add(&mut self, product: &Product, quantity: u32) -> LineItem {
        if let Some(line) = self.find_mut(&product.id) {
            line.quantity += quantity;
            return line.clone();
        }

        let line = LineItem::from_product(product, quantity);
        self.lines.push(line.clone());
        line
    }

    /// Set the quantity exactly (not additive). Returns `false` when the
    /// product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        match self.find_mut(product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the line for `product_id`. Returns `false` when absent.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        self.lines.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Recompute the derived totals.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let currency = self
            .lines
            .first()
            .map_or(CurrencyCode::default(), |line| line.price.currency_code);

        let subtotal = self
            .lines
            .iter()
            .fold(Price::zero(currency), |sum, line| sum.plus(&line.line_total()));

        CartTotals {
            item_count: self.lines.iter().map(|line| line.quantity).sum(),
            subtotal,
        }
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }
}

/// Cart with write-through persistence and change events.
pub struct CartEngine {
    cart: Cart,
    store: StoreHandle,
    events: SharedSink,
}

impl CartEngine {
    /// Load the cart from the store.
    ///
    /// Entries are deserialized item by item; any entry missing a required
    /// field is dropped with a warning rather than failing the whole load.
    #[must_use]
    pub fn load(store: StoreHandle, events: SharedSink) -> Self {
        let lines = load_valid_items(&store, keys::CART);
        Self {
            cart: Cart::from_lines(lines),
            store,
            events,
        }
    }

    /// Add `quantity` of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// `Validation` when `quantity` is 0.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<LineItem, ClientError> {
        if quantity == 0 {
            return Err(ClientError::Validation(
                "quantity must be at least 1".to_owned(),
            ));
        }

        let line = self.cart.add(product, quantity);
        self.persist();
        Ok(line)
    }

    /// Set the quantity of a line exactly; 0 removes it.
    ///
    /// # Errors
    ///
    /// `Validation` when the product is not in the cart and `quantity` > 0.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        if !self.cart.set_quantity(product_id, quantity) {
            return Err(ClientError::Validation(format!(
                "product {product_id} is not in the cart"
            )));
        }

        self.persist();
        Ok(())
    }

    /// Remove the line for `product_id`. Removing an absent product is a
    /// no-op, not an error.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        if self.cart.remove(product_id) {
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        self.cart.lines()
    }

    /// Recompute the derived totals.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    fn persist(&self) {
        self.store.write_json(keys::CART, &self.cart.lines());
        self.events.emit(&ClientEvent::CartChanged(self.totals()));
    }
}

/// Read a persisted sequence item by item, dropping entries that fail to
/// deserialize instead of failing the whole load.
pub(crate) fn load_valid_items<T: serde::de::DeserializeOwned>(
    store: &StoreHandle,
    key: &str,
) -> Vec<T> {
    store
        .read_json::<Vec<serde_json::Value>>(key)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(key, error = %err, "dropping malformed persisted entry");
                None
            }
        })
        .collect()
}

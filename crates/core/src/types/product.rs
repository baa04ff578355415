//! Catalog product snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A validated product snapshot from the catalog boundary.
///
/// Cart line items and wishlist entries are constructed only from this type,
/// built once where catalog data enters the core - UI event handlers never
/// hand the engines ad hoc shapes. Price and display fields are frozen at the
/// time of the snapshot, so a later catalog price change does not alter a
/// line already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name at time of snapshot.
    pub name: String,
    /// Unit price at time of snapshot.
    pub price: Price,
    /// Primary image URL, when the catalog provides one.
    pub image: Option<String>,
}

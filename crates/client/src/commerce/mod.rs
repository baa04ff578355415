//! Cart & wishlist engine.
//!
//! Line-item quantities and the favorites set, with write-through
//! persistence and derived totals. Both engines own their state exclusively:
//! UI code mutates only through these operations, and every mutation is
//! serialized to the store before the operation returns, so a reload always
//! reflects the last completed mutation.

mod cart;
mod wishlist;

pub use cart::{Cart, CartEngine, CartTotals, LineItem};
pub use wishlist::{WishlistEngine, WishlistEntry};

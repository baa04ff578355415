//! Shared type definitions.
//!
//! Newtype wrappers and small value types shared between the client core and
//! its consumers. Everything here is plain data: serializable, cloneable, and
//! free of I/O.

mod credential;
mod email;
mod id;
mod price;
mod product;
mod token;

pub use credential::{SessionCredential, UserProfile};
pub use email::{Email, EmailError};
pub use id::{ProductId, UserId};
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use token::{AccessToken, RefreshToken, TokenPair};

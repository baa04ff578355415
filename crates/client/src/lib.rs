//! Sungrove Client - session & commerce-state core.
//!
//! The stateful heart of the Sungrove storefront client:
//!
//! - [`store`] - narrow key/value adapter over durable client storage
//! - [`session`] - access/refresh credential lifecycle with the
//!   at-most-one-retry refresh policy
//! - [`auth`] - the OTP request → verify → session-established state machine
//! - [`admin`] - the independently-gated admin session
//! - [`commerce`] - cart and wishlist with write-through persistence and
//!   derived totals
//! - [`api`] - the backend boundary, consumed as opaque request/response
//!
//! Page rendering, routing, catalog display, and the backend services
//! themselves are external collaborators. The UI constructs one
//! [`ClientSession`] at startup, hands it an [`EventSink`], and drives
//! everything through its operations; all failures come back as
//! [`ClientError`] result values, never as panics.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod api;
pub mod auth;
pub mod commerce;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod state;
pub mod store;

pub use admin::{AdminAccess, AdminGate};
pub use api::{ApiError, HttpApi, StorefrontApi, TokenGrant};
pub use auth::{AuthPhase, CustomerAuth, DEFAULT_MAX_OTP_ATTEMPTS, OtpChallenge};
pub use commerce::{Cart, CartEngine, CartTotals, LineItem, WishlistEngine, WishlistEntry};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use events::{ClientEvent, EventSink, NullSink, SharedSink};
pub use session::CredentialVault;
pub use state::ClientSession;
pub use store::{FileStore, MemoryStore, Store, StoreHandle};

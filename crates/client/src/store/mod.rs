//! Persistent store adapter.
//!
//! A narrow key/value abstraction over durable client storage, used by the
//! credential vault and the cart/wishlist engines. The contract is
//! deliberately small:
//!
//! - reads of a missing key return absent, never an error
//! - writes are synchronous and immediately visible to subsequent reads in
//!   the same process
//! - malformed serialized content reads as absent (`StorageCorrupt` is
//!   recovered locally with a warning, never surfaced to the user)
//!
//! Cross-process races are last-write-wins and a second process does not get
//! a change notification; this is a documented limitation, not a defect.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys used by the core.
pub mod keys {
    /// Serialized [`SessionCredential`](sungrove_core::SessionCredential)
    /// record (one record, not per-field keys, so a partial write is never
    /// readable).
    pub const SESSION: &str = "session";

    /// Serialized ordered sequence of cart line items.
    pub const CART: &str = "cart";

    /// Serialized wishlist entries.
    pub const WISHLIST: &str = "wishlist";

    /// Admin session flag, stored as the literal string `"true"`.
    pub const ADMIN_FLAG: &str = "adminAuth";
}

/// Durable key/value storage.
///
/// Implementations must not fail reads: a missing key is `None`, and write
/// problems degrade (with a log) rather than propagate.
pub trait Store: Send {
    /// Read the value for `key`, absent if never written or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`.
    fn set(&mut self, key: &str, value: &str);

    /// Remove `key`. Removing an absent key is a no-op.
    fn remove(&mut self, key: &str);
}

/// Cloneable handle to a shared store namespace.
///
/// All core components in one session share handles to the same underlying
/// store, serialized by a mutex that is only ever held for the duration of a
/// single synchronous operation (never across an await point).
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<Box<dyn Store>>>,
}

impl StoreHandle {
    /// Wrap a store implementation.
    #[must_use]
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(store))),
        }
    }

    /// In-memory store, for tests and ephemeral sessions.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// File-backed store for `namespace` under `dir`.
    #[must_use]
    pub fn file(dir: &std::path::Path, namespace: &str) -> Self {
        Self::new(FileStore::open(dir, namespace))
    }

    /// Read the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key)
    }

    /// Write the raw value for `key`.
    pub fn set(&self, key: &str, value: &str) {
        self.lock().set(key, value);
    }

    /// Remove `key`.
    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Read and deserialize the record under `key`.
    ///
    /// Malformed content is dropped with a warning and reads as absent;
    /// callers fall back to their logged-out / empty default.
    #[must_use]
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "dropping malformed persisted record");
                None
            }
        }
    }

    /// Serialize and write the record under `key`.
    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set(key, &json),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to serialize record, keeping previous value");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Store>> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the map itself is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

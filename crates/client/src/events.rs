//! UI-facing events emitted by the core.
//!
//! Presentation collaborators subscribe by handing the session context an
//! [`EventSink`]; the core never renders anything itself. Delivery is
//! synchronous on the caller's (single-threaded) event loop.

use std::sync::Arc;

use crate::commerce::CartTotals;

/// Events the core emits for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A customer or admin credential was established.
    SessionEstablished,
    /// The credential was cleared: explicit logout or irrecoverable refresh
    /// failure. Authenticated views should redirect rather than render.
    SessionEnded,
    /// The cart changed; carries the recomputed totals.
    CartChanged(CartTotals),
    /// The wishlist changed.
    WishlistChanged,
}

/// Receiver for [`ClientEvent`]s.
pub trait EventSink: Send + Sync {
    /// Handle one event. Must not re-enter the core.
    fn emit(&self, event: &ClientEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &ClientEvent) {
        (**self).emit(event);
    }
}

/// Sink that discards every event.
///
/// Default for headless use (tests, CLI commands that only print results).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &ClientEvent) {}
}

/// Shared handle to the configured sink.
pub type SharedSink = Arc<dyn EventSink>;

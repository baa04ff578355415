//! Client session context.
//!
//! One explicitly-constructed object owning every piece of core state: the
//! storage namespaces, the credential vaults, the auth machines, and the
//! cart/wishlist engines. Components that need the core receive this context
//! (or a piece of it) - there is no ambient global state, and teardown is
//! just dropping the session.

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use uuid::Uuid;

use sungrove_core::AccessToken;

use crate::admin::{AdminAccess, AdminGate};
use crate::api::{ApiError, StorefrontApi};
use crate::auth::CustomerAuth;
use crate::commerce::{CartEngine, WishlistEngine};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::{EventSink, SharedSink};
use crate::session::CredentialVault;
use crate::store::StoreHandle;

/// Customer-side storage namespace.
const CUSTOMER_NAMESPACE: &str = "customer";
/// Admin-side storage namespace, a separate trust boundary.
const ADMIN_NAMESPACE: &str = "admin";

/// The client core's session context.
///
/// Construction restores persisted state (credential, cart, wishlist) and
/// wires every component to the same event sink. All operations go through
/// the accessors; UI code never touches the underlying stores directly.
pub struct ClientSession<A: StorefrontApi> {
    api: Arc<A>,
    auth: CustomerAuth,
    admin: AdminGate,
    cart: CartEngine,
    wishlist: WishlistEngine,
    instance: Uuid,
}

impl<A: StorefrontApi> ClientSession<A> {
    /// Construct the context, restoring persisted state.
    #[must_use]
    pub fn new(config: &ClientConfig, api: A, events: impl EventSink + 'static) -> Self {
        let events: SharedSink = Arc::new(events);

        let (customer_store, admin_store) = match &config.data_dir {
            Some(dir) => (
                StoreHandle::file(dir, CUSTOMER_NAMESPACE),
                StoreHandle::file(dir, ADMIN_NAMESPACE),
            ),
            None => (StoreHandle::memory(), StoreHandle::memory()),
        };

        let auth = CustomerAuth::restore(
            CredentialVault::new(customer_store.clone(), Arc::clone(&events)),
            config.max_otp_attempts,
        );
        let admin = AdminGate::new(admin_store, Arc::clone(&events));
        let cart = CartEngine::load(customer_store.clone(), Arc::clone(&events));
        let wishlist = WishlistEngine::load(customer_store, events);

        let instance = Uuid::new_v4();
        tracing::info!(
            %instance,
            restored_session = auth.is_authenticated(),
            cart_lines = cart.lines().len(),
            "client session constructed"
        );

        Self {
            api: Arc::new(api),
            auth,
            admin,
            cart,
            wishlist,
            instance,
        }
    }

    /// Correlation ID for this session instance, used in logs.
    #[must_use]
    pub const fn instance(&self) -> Uuid {
        self.instance
    }

    /// The customer auth state machine.
    #[must_use]
    pub const fn auth(&self) -> &CustomerAuth {
        &self.auth
    }

    /// The admin session gate.
    #[must_use]
    pub const fn admin(&self) -> &AdminGate {
        &self.admin
    }

    /// The cart engine.
    #[must_use]
    pub const fn cart(&self) -> &CartEngine {
        &self.cart
    }

    /// Mutable cart engine, for UI mutations.
    pub const fn cart_mut(&mut self) -> &mut CartEngine {
        &mut self.cart
    }

    /// The wishlist engine.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistEngine {
        &self.wishlist
    }

    /// Mutable wishlist engine, for UI mutations.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistEngine {
        &mut self.wishlist
    }

    // ─────────────────────────────────────────────────────────────────────
    // Customer auth operations
    // ─────────────────────────────────────────────────────────────────────

    /// Request an OTP for `email`. See [`CustomerAuth::request_otp`].
    ///
    /// # Errors
    ///
    /// Propagates the machine's error unchanged.
    pub async fn request_otp(&mut self, email: &str) -> Result<(), ClientError> {
        let api = Arc::clone(&self.api);
        self.auth.request_otp(api.as_ref(), email).await
    }

    /// Verify an OTP code. See [`CustomerAuth::verify_otp`].
    ///
    /// # Errors
    ///
    /// Propagates the machine's error unchanged.
    pub async fn verify_otp(
        &mut self,
        email: &str,
        code: &str,
        name: Option<&str>,
    ) -> Result<(), ClientError> {
        let api = Arc::clone(&self.api);
        self.auth.verify_otp(api.as_ref(), email, code, name).await
    }

    /// Abandon the OTP flow.
    pub fn cancel_otp(&mut self) {
        self.auth.cancel();
    }

    /// End the customer session.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no session is active.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.auth.logout()
    }

    /// Run an authenticated customer operation under the
    /// at-most-one-retry refresh policy. See [`CredentialVault::with_refresh`].
    ///
    /// # Errors
    ///
    /// Propagates the vault's error unchanged.
    pub async fn authenticated<T, F, Fut>(&self, operation: F) -> Result<T, ClientError>
    where
        F: FnMut(Option<AccessToken>) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.auth
            .vault()
            .with_refresh(self.api.as_ref(), operation)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Admin operations
    // ─────────────────────────────────────────────────────────────────────

    /// Log in to the admin surface.
    ///
    /// # Errors
    ///
    /// Propagates the gate's error unchanged.
    pub async fn admin_login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        let api = Arc::clone(&self.api);
        self.admin.login(api.as_ref(), email, password).await
    }

    /// Evaluate the admin guard. Call on every navigation into the admin
    /// surface.
    #[must_use]
    pub fn admin_check(&self) -> AdminAccess {
        self.admin.check()
    }

    /// Log out of the admin surface.
    pub fn admin_logout(&mut self) {
        self.admin.logout();
    }
}

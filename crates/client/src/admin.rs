//! Admin session gate.
//!
//! A minimal two-state session (`LoggedOut`, `LoggedIn`) independent of the
//! customer auth machine, layered on the same credential-vault contract but
//! with its own storage namespace and trust boundary. There is no OTP flow:
//! admins submit email and password directly.
//!
//! Protected admin views call [`AdminGate::check`] on every navigation into
//! the admin surface. The result is derived from storage each time, never
//! cached, because the admin token may have been cleared by a prior
//! unauthorized-response handling.

use secrecy::SecretString;
use tracing::instrument;

use sungrove_core::{Email, UserProfile};

use crate::api::StorefrontApi;
use crate::error::ClientError;
use crate::events::SharedSink;
use crate::session::CredentialVault;
use crate::store::{StoreHandle, keys};

/// Outcome of the admin guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAccess {
    /// Both the flag and a complete admin credential are present.
    Granted(UserProfile),
    /// Either is missing; the view must redirect to the admin login entry
    /// point rather than render.
    RedirectToLogin,
}

/// The admin session gate.
pub struct AdminGate {
    store: StoreHandle,
    vault: CredentialVault,
}

impl AdminGate {
    /// Create a gate over the admin storage namespace.
    #[must_use]
    pub fn new(store: StoreHandle, events: SharedSink) -> Self {
        let vault = CredentialVault::new(store.clone(), events);
        Self { store, vault }
    }

    /// Log in with email and password.
    ///
    /// On success the admin credential is established and the flag is set;
    /// the gate is `LoggedIn`.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed email, or the mapped backend error when
    /// the credentials are rejected.
    #[instrument(skip(self, api, password))]
    pub async fn login<A: StorefrontApi>(
        &mut self,
        api: &A,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        let email = Email::parse(email)?;

        let grant = api
            .admin_login(&email, password)
            .await
            .map_err(ClientError::from)?;

        self.vault.establish(grant.into_credential());
        self.store.set(keys::ADMIN_FLAG, "true");

        Ok(())
    }

    /// Evaluate the guard. Call on every navigation into the admin surface.
    ///
    /// Requires both the flag and a complete stored credential; a stale
    /// token without the flag (or the reverse) reads as logged out.
    #[must_use]
    pub fn check(&self) -> AdminAccess {
        let flag_set = self.store.get(keys::ADMIN_FLAG).as_deref() == Some("true");

        match (flag_set, self.vault.current()) {
            (true, Some(credential)) => AdminAccess::Granted(credential.user),
            _ => AdminAccess::RedirectToLogin,
        }
    }

    /// Whether the gate currently grants access.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        matches!(self.check(), AdminAccess::Granted(_))
    }

    /// Log out: clears the flag and the stored credential. Idempotent.
    pub fn logout(&mut self) {
        self.store.remove(keys::ADMIN_FLAG);
        self.vault.clear();
    }

    /// The credential vault backing the admin session.
    ///
    /// Used to decorate admin API requests and to run them under the
    /// refresh-then-retry policy.
    #[must_use]
    pub const fn vault(&self) -> &CredentialVault {
        &self.vault
    }
}

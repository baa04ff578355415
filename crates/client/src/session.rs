//! Credential lifecycle management.
//!
//! The [`CredentialVault`] owns one persisted [`SessionCredential`] record:
//! it establishes the record on sign-in, decorates outgoing requests with the
//! bearer token, renews the token pair when the backend reports an expired
//! access token, and clears the record on logout or irrecoverable refresh
//! failure. The customer session and the admin session each hold their own
//! vault over separate storage namespaces.

use std::future::Future;

use sungrove_core::{AccessToken, SessionCredential, TokenPair};

use crate::api::{ApiError, StorefrontApi};
use crate::error::ClientError;
use crate::events::{ClientEvent, SharedSink};
use crate::store::{StoreHandle, keys};

/// Owner of one persisted session credential.
#[derive(Clone)]
pub struct CredentialVault {
    store: StoreHandle,
    events: SharedSink,
}

impl CredentialVault {
    /// Create a vault over `store`, emitting session events to `events`.
    #[must_use]
    pub fn new(store: StoreHandle, events: SharedSink) -> Self {
        Self { store, events }
    }

    /// Persist a full credential as one atomic record.
    ///
    /// Emits [`ClientEvent::SessionEstablished`].
    pub fn establish(&self, credential: SessionCredential) {
        self.store.write_json(keys::SESSION, &credential);
        self.events.emit(&ClientEvent::SessionEstablished);
    }

    /// The current credential, if a complete one is persisted.
    ///
    /// A record that is missing, malformed, or partial (empty token or user
    /// ID) reads as absent - readers never see a half-written session.
    #[must_use]
    pub fn current(&self) -> Option<SessionCredential> {
        self.store
            .read_json::<SessionCredential>(keys::SESSION)
            .filter(SessionCredential::is_complete)
    }

    /// The bearer token for outgoing requests, if signed in.
    #[must_use]
    pub fn bearer(&self) -> Option<AccessToken> {
        self.current().map(|credential| credential.access_token)
    }

    /// Decorate an outgoing request with `Authorization: Bearer` when a
    /// credential is present; otherwise the request proceeds unauthenticated.
    #[must_use]
    pub fn attach_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer() {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    /// Remove the persisted credential. Idempotent.
    ///
    /// Emits [`ClientEvent::SessionEnded`] if a credential was present.
    pub fn clear(&self) {
        let was_present = self.current().is_some();
        self.store.remove(keys::SESSION);
        if was_present {
            self.events.emit(&ClientEvent::SessionEnded);
        }
    }

    /// Replace the persisted token pair in place, keeping the profile.
    fn rotate(&self, pair: TokenPair) -> Option<SessionCredential> {
        let mut credential = self.current()?;
        credential.rotate_tokens(pair);
        self.store.write_json(keys::SESSION, &credential);
        Some(credential)
    }

    /// Run an authenticated operation with the at-most-one-retry refresh
    /// policy.
    ///
    /// `operation` receives the bearer token (absent when signed out) and
    /// performs one backend call. If it reports [`ApiError::Unauthorized`],
    /// exactly one refresh is attempted:
    ///
    /// - refresh succeeds: the rotated credential is persisted and the
    ///   operation is retried once with the new token; a second
    ///   `Unauthorized` surfaces as [`ClientError::Rejected`] without another
    ///   refresh, preventing a refresh loop
    /// - refresh is rejected (`invalid_refresh_token`): the credential is
    ///   cleared, [`ClientEvent::SessionEnded`] fires, and
    ///   [`ClientError::AuthExpired`] is returned
    /// - refresh fails at the transport level: the credential is untouched
    ///   and [`ClientError::TransientNetwork`] is returned so the caller may
    ///   retry later
    ///
    /// # Errors
    ///
    /// Any [`ClientError`] kind described above, or the mapped error of the
    /// first attempt when it fails for a reason other than authorization.
    pub async fn with_refresh<A, T, F, Fut>(
        &self,
        api: &A,
        mut operation: F,
    ) -> Result<T, ClientError>
    where
        A: StorefrontApi,
        F: FnMut(Option<AccessToken>) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match operation(self.bearer()).await {
            Ok(value) => return Ok(value),
            Err(ApiError::Unauthorized) => {}
            Err(other) => return Err(other.into()),
        }

        let Some(credential) = self.current() else {
            // Nothing to refresh with; the session never existed or was
            // already torn down by a concurrent failure.
            return Err(ClientError::AuthExpired);
        };

        tracing::debug!("access token rejected, attempting refresh");

        match api.refresh(&credential.refresh_token).await {
            Ok(pair) => {
                let token = self
                    .rotate(pair)
                    .map(|credential| credential.access_token);

                operation(token).await.map_err(|err| match err {
                    ApiError::Unauthorized => {
                        ClientError::Rejected("request unauthorized after token refresh".to_owned())
                    }
                    other => other.into(),
                })
            }
            Err(ApiError::InvalidRefreshToken | ApiError::Unauthorized) => {
                tracing::info!("refresh token rejected, ending session");
                self.clear();
                Err(ClientError::AuthExpired)
            }
            Err(ApiError::Network(message)) => Err(ClientError::TransientNetwork(message)),
            Err(other) => Err(other.into()),
        }
    }
}

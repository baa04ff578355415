//! Backend API boundary.
//!
//! The storefront backend validates OTPs, issues tokens, and persists orders;
//! this core consumes it as an opaque request/response boundary and never
//! implements its internals. [`StorefrontApi`] is the trait seam: production
//! code uses the HTTP implementation in [`http`], integration tests script a
//! mock.

mod http;

pub use http::HttpApi;

use std::future::Future;

use secrecy::SecretString;
use thiserror::Error;

use sungrove_core::{Email, RefreshToken, SessionCredential, TokenPair, UserProfile};

/// Errors from the backend boundary.
///
/// Transport failures and explicit backend rejections are distinct kinds
/// here so that callers can apply the right policy: transient failures are
/// retryable and non-destructive, an invalid refresh token is terminal for
/// the session.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request was rejected as unauthenticated (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The refresh token was explicitly rejected; the session cannot be
    /// renewed.
    #[error("refresh token invalid")]
    InvalidRefreshToken,

    /// Explicit error payload from the backend (wrong code, unknown email,
    /// bad password).
    #[error("rejected: {0}")]
    Rejected(String),

    /// Transport-level failure: DNS, connect, timeout.
    #[error("network failure: {0}")]
    Network(String),

    /// The response body did not match the contract.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Tokens plus profile snapshot returned by verification and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// The freshly-issued token pair.
    pub tokens: TokenPair,
    /// Profile snapshot for the signed-in user.
    pub user: UserProfile,
}

impl TokenGrant {
    /// Bind the grant into a persistable credential record.
    #[must_use]
    pub fn into_credential(self) -> SessionCredential {
        SessionCredential {
            access_token: self.tokens.access_token,
            refresh_token: self.tokens.refresh_token,
            user: self.user,
        }
    }
}

/// The storefront backend, as consumed by this core.
///
/// Implementations map every transport or payload problem into an
/// [`ApiError`]; nothing here panics or leaks library-specific error types.
pub trait StorefrontApi: Send + Sync {
    /// Request an OTP be sent to `email`.
    fn send_otp(&self, email: &Email) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Exchange an OTP code for a credential. `name` is passed through for
    /// first-time registration.
    fn verify_otp(
        &self,
        email: &Email,
        code: &str,
        name: Option<&str>,
    ) -> impl Future<Output = Result<TokenGrant, ApiError>> + Send;

    /// Direct email/password login for the admin surface.
    fn admin_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<TokenGrant, ApiError>> + Send;

    /// Mint a new token pair from a refresh token.
    fn refresh(
        &self,
        refresh_token: &RefreshToken,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send;
}

impl<A: StorefrontApi + ?Sized> StorefrontApi for std::sync::Arc<A> {
    fn send_otp(&self, email: &Email) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).send_otp(email)
    }

    fn verify_otp(
        &self,
        email: &Email,
        code: &str,
        name: Option<&str>,
    ) -> impl Future<Output = Result<TokenGrant, ApiError>> + Send {
        (**self).verify_otp(email, code, name)
    }

    fn admin_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<TokenGrant, ApiError>> + Send {
        (**self).admin_login(email, password)
    }

    fn refresh(
        &self,
        refresh_token: &RefreshToken,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send {
        (**self).refresh(refresh_token)
    }
}

//! Unified error handling for the client core.
//!
//! Provides a unified `ClientError` type returned by every core operation.
//! Errors are result values, never panics: validation and challenge errors
//! resolve inside the state machines, and network/backend failures are
//! captured into the same kinds before reaching presentation code, so the UI
//! never needs to distinguish "the network lib threw" from "the backend said
//! no."

use thiserror::Error;

use sungrove_core::EmailError;

use crate::api::ApiError;

/// Client-core error type.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Bad input shape (e.g., empty email). Reported inline, no state change.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Verify attempted without a matching outstanding OTP challenge.
    /// Reported, no state change.
    #[error("no matching verification challenge is outstanding")]
    ChallengeMismatch,

    /// The operation is not valid in the machine's current state.
    #[error("operation not valid right now: {0}")]
    InvalidState(&'static str),

    /// Explicit error payload from the backend (e.g., wrong OTP code).
    /// Bounded retry is permitted.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Network-level failure. Retryable; no destructive state change.
    #[error("network failure: {0}")]
    TransientNetwork(String),

    /// The refresh token was rejected. The credential has been cleared and
    /// the user must re-authenticate.
    #[error("session expired, sign in again")]
    AuthExpired,

    /// The OTP attempt limit was reached; the challenge has been discarded.
    #[error("too many incorrect codes, request a new one")]
    AttemptsExhausted,
}

impl From<EmailError> for ClientError {
    fn from(err: EmailError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::Rejected("unauthorized".to_owned()),
            ApiError::InvalidRefreshToken => Self::AuthExpired,
            ApiError::Rejected(message) => Self::Rejected(message),
            ApiError::Network(message) => Self::TransientNetwork(message),
            ApiError::Decode(message) => Self::Rejected(format!("malformed response: {message}")),
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_error_maps_to_validation() {
        let err = ClientError::from(EmailError::Empty);
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_api_error_mapping() {
        assert!(matches!(
            ClientError::from(ApiError::Network("timeout".to_owned())),
            ClientError::TransientNetwork(_)
        ));
        assert!(matches!(
            ClientError::from(ApiError::InvalidRefreshToken),
            ClientError::AuthExpired
        ));
        assert!(matches!(
            ClientError::from(ApiError::Rejected("nope".to_owned())),
            ClientError::Rejected(_)
        ));
    }
}

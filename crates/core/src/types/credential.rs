//! Session credential types.
//!
//! The credential record persisted for a signed-in customer or admin: both
//! bearer tokens plus a denormalized profile snapshot. The snapshot is for
//! display only and is not authoritative.

use serde::{Deserialize, Serialize};

use crate::types::{AccessToken, Email, RefreshToken, TokenPair, UserId};

/// Denormalized profile snapshot captured at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend-issued user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address the session was established for.
    pub email: Email,
}

/// A full session credential: token pair plus profile snapshot.
///
/// ## Invariant
///
/// A credential is either fully present or fully absent. It is persisted as
/// one serialized record, and readers call [`SessionCredential::is_complete`]
/// before trusting any field, so a partial state is never observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    /// Bearer token for authenticated requests.
    pub access_token: AccessToken,
    /// Token used solely to mint new access tokens.
    pub refresh_token: RefreshToken,
    /// Profile snapshot captured when the session was established.
    pub user: UserProfile,
}

impl SessionCredential {
    /// Whether every field carries a usable value.
    ///
    /// A record that deserialized but holds an empty token or user ID is
    /// treated as absent by readers.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty() && !self.user.id.is_empty()
    }

    /// Replace the token pair in place, keeping the profile snapshot.
    ///
    /// Used when an expired access token is refreshed.
    pub fn rotate_tokens(&mut self, pair: TokenPair) {
        self.access_token = pair.access_token;
        self.refresh_token = pair.refresh_token;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn credential() -> SessionCredential {
        SessionCredential {
            access_token: AccessToken::new("t1"),
            refresh_token: RefreshToken::new("r1"),
            user: UserProfile {
                id: UserId::new("u1"),
                name: "Test User".to_owned(),
                email: Email::parse("user@example.com").unwrap(),
            },
        }
    }

    #[test]
    fn test_complete_credential() {
        assert!(credential().is_complete());
    }

    #[test]
    fn test_empty_token_is_incomplete() {
        let mut cred = credential();
        cred.access_token = AccessToken::new("");
        assert!(!cred.is_complete());
    }

    #[test]
    fn test_empty_user_id_is_incomplete() {
        let mut cred = credential();
        cred.user.id = UserId::new("");
        assert!(!cred.is_complete());
    }

    #[test]
    fn test_rotate_tokens_keeps_profile() {
        let mut cred = credential();
        cred.rotate_tokens(TokenPair {
            access_token: AccessToken::new("t2"),
            refresh_token: RefreshToken::new("r2"),
        });
        assert_eq!(cred.access_token, AccessToken::new("t2"));
        assert_eq!(cred.refresh_token, RefreshToken::new("r2"));
        assert_eq!(cred.user.id, UserId::new("u1"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let cred = credential();
        let json = serde_json::to_string(&cred).unwrap();
        let parsed: SessionCredential = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cred);
    }
}

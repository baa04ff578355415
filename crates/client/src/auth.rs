//! Customer authentication state machine.
//!
//! Drives the OTP request → verify → session-established flow:
//!
//! ```text
//! Anonymous ──request_otp──► OtpRequested ──verify_otp──► OtpVerifying
//!     ▲                          ▲                            │
//!     │                          └──────── wrong code ────────┤
//!     ├───── cancel / attempt limit ◄─────────────────────────┤
//!     └───────────── logout ◄──────────── Authenticated ◄── success
//! ```
//!
//! On process start the machine restores directly to `Authenticated` when a
//! complete credential is persisted - a state restoration, not a transition
//! through the OTP states. Challenges live only in memory and die with the
//! form.

use chrono::{DateTime, Utc};
use tracing::instrument;

use sungrove_core::{Email, UserProfile};

use crate::api::{ApiError, StorefrontApi, TokenGrant};
use crate::error::ClientError;
use crate::session::CredentialVault;

/// Default maximum number of wrong codes per challenge.
pub const DEFAULT_MAX_OTP_ATTEMPTS: u32 = 5;

/// Observable phase of the customer auth machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// No session and no OTP flow in progress.
    Anonymous,
    /// A challenge is outstanding; waiting for the user to enter the code.
    OtpRequested,
    /// A verification call is in flight; the UI shows a pending indicator.
    OtpVerifying,
    /// A credential is established.
    Authenticated,
}

/// An outstanding OTP challenge. In-memory only, never persisted.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    /// Email the code was sent to.
    pub email: Email,
    /// When the challenge was created.
    pub requested_at: DateTime<Utc>,
    /// Wrong codes submitted so far.
    pub attempts: u32,
    /// Stale-response guard: responses minted under an older epoch are
    /// discarded instead of applied.
    epoch: u64,
}

/// The customer auth state machine.
pub struct CustomerAuth {
    phase: AuthPhase,
    challenge: Option<OtpChallenge>,
    epoch: u64,
    max_attempts: u32,
    vault: CredentialVault,
}

impl CustomerAuth {
    /// Restore the machine from persisted state.
    ///
    /// `Authenticated` iff the vault holds a complete credential, else
    /// `Anonymous`.
    #[must_use]
    pub fn restore(vault: CredentialVault, max_attempts: u32) -> Self {
        let phase = if vault.current().is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        };

        Self {
            phase,
            challenge: None,
            epoch: 0,
            max_attempts: max_attempts.max(1),
            vault,
        }
    }

    /// Current phase, re-validated against storage.
    ///
    /// A refresh failure elsewhere may have cleared the credential out from
    /// under an `Authenticated` machine; that reads as `Anonymous` here, the
    /// same way any reader treats an absent credential as logged out.
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        if self.phase == AuthPhase::Authenticated && self.vault.current().is_none() {
            return AuthPhase::Anonymous;
        }
        self.phase
    }

    /// The outstanding challenge, if any.
    #[must_use]
    pub const fn challenge(&self) -> Option<&OtpChallenge> {
        self.challenge.as_ref()
    }

    /// Whether a credential is established.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }

    /// Profile snapshot of the signed-in customer.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.vault.current().map(|credential| credential.user)
    }

    /// The credential vault backing this machine.
    #[must_use]
    pub const fn vault(&self) -> &CredentialVault {
        &self.vault
    }

    /// Request an OTP for `email`. Valid only from `Anonymous`.
    ///
    /// On success a challenge is outstanding and the phase is
    /// `OtpRequested`. On failure the phase stays `Anonymous` and the error
    /// is reported; there is no silent retry.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `Anonymous`, `Validation` for a malformed
    /// email, and the mapped backend error when the request is rejected.
    #[instrument(skip(self, api))]
    pub async fn request_otp<A: StorefrontApi>(
        &mut self,
        api: &A,
        email: &str,
    ) -> Result<(), ClientError> {
        if self.phase() != AuthPhase::Anonymous {
            return Err(ClientError::InvalidState(
                "a sign-in flow or session is already active",
            ));
        }
        // normalize a stale Authenticated field left by an expired session
        self.phase = AuthPhase::Anonymous;

        let email = Email::parse(email)?;

        api.send_otp(&email).await.map_err(ClientError::from)?;

        self.epoch += 1;
        self.challenge = Some(OtpChallenge {
            email,
            requested_at: Utc::now(),
            attempts: 0,
            epoch: self.epoch,
        });
        self.phase = AuthPhase::OtpRequested;

        Ok(())
    }

    /// Verify the OTP `code` for `email`. Valid only while a challenge for
    /// the same email is outstanding.
    ///
    /// A wrong code returns the machine to `OtpRequested` with the attempt
    /// count incremented; reaching the attempt limit discards the challenge
    /// and drops to `Anonymous`. Success establishes the credential and the
    /// phase becomes `Authenticated`. `name` is passed through for
    /// first-time registration.
    ///
    /// # Errors
    ///
    /// `ChallengeMismatch` without a matching outstanding challenge,
    /// `Validation` for bad input, `Rejected` for a wrong code,
    /// `AttemptsExhausted` at the limit, `TransientNetwork` for transport
    /// failures (no attempt is charged).
    #[instrument(skip(self, api, code))]
    pub async fn verify_otp<A: StorefrontApi>(
        &mut self,
        api: &A,
        email: &str,
        code: &str,
        name: Option<&str>,
    ) -> Result<(), ClientError> {
        if !matches!(self.phase, AuthPhase::OtpRequested | AuthPhase::OtpVerifying) {
            return Err(ClientError::ChallengeMismatch);
        }

        let email = Email::parse(email)?;

        let Some(challenge) = self.challenge.as_ref() else {
            return Err(ClientError::ChallengeMismatch);
        };
        if challenge.email != email {
            return Err(ClientError::ChallengeMismatch);
        }

        if code.trim().is_empty() {
            return Err(ClientError::Validation("code cannot be empty".to_owned()));
        }

        let guard_epoch = challenge.epoch;
        self.phase = AuthPhase::OtpVerifying;

        let outcome = api.verify_otp(&email, code, name).await;

        self.apply_verify_outcome(guard_epoch, outcome)
    }

    /// Apply the backend's verification outcome, rejecting stale responses.
    ///
    /// The epoch captured before the call must still match the outstanding
    /// challenge; a response that arrives after the user cancelled or
    /// started over is discarded without touching state.
    fn apply_verify_outcome(
        &mut self,
        guard_epoch: u64,
        outcome: Result<TokenGrant, ApiError>,
    ) -> Result<(), ClientError> {
        if self
            .challenge
            .as_ref()
            .is_none_or(|challenge| challenge.epoch != guard_epoch)
        {
            return Err(ClientError::ChallengeMismatch);
        }

        match outcome {
            Ok(grant) => {
                self.vault.establish(grant.into_credential());
                self.challenge = None;
                self.epoch += 1;
                self.phase = AuthPhase::Authenticated;
                Ok(())
            }
            Err(ApiError::Rejected(message)) => self.record_failed_attempt(message),
            Err(ApiError::Unauthorized) => {
                self.record_failed_attempt("incorrect code".to_owned())
            }
            Err(ApiError::Network(message)) => {
                // Transient: the attempt never reached the backend, so no
                // attempt is charged and the challenge stays usable.
                self.phase = AuthPhase::OtpRequested;
                Err(ClientError::TransientNetwork(message))
            }
            Err(other) => {
                self.phase = AuthPhase::OtpRequested;
                Err(other.into())
            }
        }
    }

    fn record_failed_attempt(&mut self, message: String) -> Result<(), ClientError> {
        let attempts = match self.challenge.as_mut() {
            Some(challenge) => {
                challenge.attempts += 1;
                challenge.attempts
            }
            None => return Err(ClientError::ChallengeMismatch),
        };

        if attempts >= self.max_attempts {
            tracing::info!(attempts, "attempt limit reached, discarding challenge");
            self.challenge = None;
            self.epoch += 1;
            self.phase = AuthPhase::Anonymous;
            return Err(ClientError::AttemptsExhausted);
        }

        self.phase = AuthPhase::OtpRequested;
        Err(ClientError::Rejected(message))
    }

    /// Abandon the OTP flow (user navigated away). No-op outside the OTP
    /// states.
    pub fn cancel(&mut self) {
        if matches!(self.phase, AuthPhase::OtpRequested | AuthPhase::OtpVerifying) {
            self.challenge = None;
            self.epoch += 1;
            self.phase = AuthPhase::Anonymous;
        }
    }

    /// End the session. Valid only from `Authenticated`.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no session is active.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        if self.phase() != AuthPhase::Authenticated {
            return Err(ClientError::InvalidState("no active session"));
        }

        self.vault.clear();
        self.phase = AuthPhase::Anonymous;
        Ok(())
    }
}

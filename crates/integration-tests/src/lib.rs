//! Integration test harness for the Sungrove client core.
//!
//! Provides a scripted [`MockApi`] standing in for the storefront backend,
//! a [`RecordingSink`] capturing UI-facing events, and a [`TestContext`]
//! bundling both with an in-memory session context.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sungrove-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - OTP state machine scenarios
//! - `credential_refresh` - refresh-then-retry policy
//! - `admin_gate` - admin guard evaluation
//! - `cart_persistence` - cart/wishlist invariants and reload survival

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;
use url::Url;

use sungrove_client::api::{ApiError, StorefrontApi, TokenGrant};
use sungrove_client::{ClientConfig, ClientEvent, ClientSession, EventSink};
use sungrove_core::{
    AccessToken, CurrencyCode, Email, Price, Product, ProductId, RefreshToken, TokenPair, UserId,
    UserProfile,
};

/// Backend double with scripted responses.
///
/// Each endpoint pops from its own queue; an empty queue answers with a
/// rejection so a test that forgets to script a call fails loudly instead of
/// hanging on a default success. Every call is appended to [`MockApi::calls`]
/// for assertions on call counts and order.
#[derive(Default)]
pub struct MockApi {
    send_otp: Mutex<VecDeque<Result<(), ApiError>>>,
    verify_otp: Mutex<VecDeque<Result<TokenGrant, ApiError>>>,
    admin_login: Mutex<VecDeque<Result<TokenGrant, ApiError>>>,
    refresh: Mutex<VecDeque<Result<TokenPair, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    /// Empty mock; every unscripted call is rejected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `send_otp` response.
    pub fn queue_send_otp(&self, response: Result<(), ApiError>) {
        lock(&self.send_otp).push_back(response);
    }

    /// Script the next `verify_otp` response.
    pub fn queue_verify_otp(&self, response: Result<TokenGrant, ApiError>) {
        lock(&self.verify_otp).push_back(response);
    }

    /// Script the next `admin_login` response.
    pub fn queue_admin_login(&self, response: Result<TokenGrant, ApiError>) {
        lock(&self.admin_login).push_back(response);
    }

    /// Script the next `refresh` response.
    pub fn queue_refresh(&self, response: Result<TokenPair, ApiError>) {
        lock(&self.refresh).push_back(response);
    }

    /// Every call made so far, e.g. `"refresh"` or `"send_otp:a@b.com"`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of calls to the named endpoint.
    #[must_use]
    pub fn call_count(&self, endpoint: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.split(':').next() == Some(endpoint))
            .count()
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
        lock(queue)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Rejected("no scripted response".to_owned())))
    }
}

impl StorefrontApi for MockApi {
    async fn send_otp(&self, email: &Email) -> Result<(), ApiError> {
        self.record(format!("send_otp:{email}"));
        Self::next(&self.send_otp)
    }

    async fn verify_otp(
        &self,
        email: &Email,
        code: &str,
        _name: Option<&str>,
    ) -> Result<TokenGrant, ApiError> {
        self.record(format!("verify_otp:{email}:{code}"));
        Self::next(&self.verify_otp)
    }

    async fn admin_login(
        &self,
        email: &Email,
        _password: &SecretString,
    ) -> Result<TokenGrant, ApiError> {
        self.record(format!("admin_login:{email}"));
        Self::next(&self.admin_login)
    }

    async fn refresh(&self, _refresh_token: &RefreshToken) -> Result<TokenPair, ApiError> {
        self.record("refresh".to_owned());
        Self::next(&self.refresh)
    }
}

/// Event sink that records everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ClientEvent>>,
}

impl RecordingSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received so far.
    #[must_use]
    pub fn events(&self) -> Vec<ClientEvent> {
        lock(&self.events).clone()
    }

    /// Whether an event equal to `event` was received.
    #[must_use]
    pub fn saw(&self, event: &ClientEvent) -> bool {
        lock(&self.events).contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ClientEvent) {
        lock(&self.events).push(event.clone());
    }
}

/// Shared harness: mock backend, recording sink, and an in-memory session.
pub struct TestContext {
    /// Handle to the scripted backend.
    pub api: Arc<MockApi>,
    /// Handle to the captured events.
    pub sink: Arc<RecordingSink>,
    /// The session context under test.
    pub session: ClientSession<Arc<MockApi>>,
}

impl TestContext {
    /// In-memory session wired to a fresh mock backend and sink.
    #[must_use]
    pub fn new() -> Self {
        let api = Arc::new(MockApi::new());
        let sink = Arc::new(RecordingSink::new());

        let config = ClientConfig::new(Url::parse("https://api.sungrove.test").expect("static url"));
        let session = ClientSession::new(&config, Arc::clone(&api), Arc::clone(&sink));

        Self { api, sink, session }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// A token grant for `user_id` with the given token values.
#[must_use]
pub fn grant(access: &str, refresh: &str, user_id: &str) -> TokenGrant {
    TokenGrant {
        tokens: pair(access, refresh),
        user: profile(user_id),
    }
}

/// A token pair.
#[must_use]
pub fn pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access_token: AccessToken::new(access),
        refresh_token: RefreshToken::new(refresh),
    }
}

/// A profile snapshot for `user_id`.
#[must_use]
pub fn profile(user_id: &str) -> UserProfile {
    UserProfile {
        id: UserId::new(user_id),
        name: "Test User".to_owned(),
        email: Email::parse("user@example.com").expect("static email"),
    }
}

/// A catalog product snapshot.
#[must_use]
pub fn product(id: &str, price: &str) -> Product {
    let amount: rust_decimal::Decimal = price.parse().expect("decimal price fixture");
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Price::new(amount, CurrencyCode::USD),
        image: None,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Refresh-then-retry policy scenarios.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use sungrove_client::api::ApiError;
use sungrove_client::{ClientError, ClientEvent, CredentialVault, StoreHandle};
use sungrove_core::{AccessToken, RefreshToken};

use sungrove_integration_tests::{MockApi, RecordingSink, grant, pair};

fn vault_with_credential() -> (MockApi, Arc<RecordingSink>, CredentialVault) {
    let api = MockApi::new();
    let sink = Arc::new(RecordingSink::new());
    let vault = CredentialVault::new(StoreHandle::memory(), sink.clone());
    vault.establish(grant("t1", "r1", "u1").into_credential());
    (api, sink, vault)
}

#[tokio::test]
async fn success_passes_through_without_refresh() {
    let (api, _sink, vault) = vault_with_credential();

    let result = vault
        .with_refresh(&api, |token| async move {
            assert_eq!(token, Some(AccessToken::new("t1")));
            Ok::<_, ApiError>("order placed")
        })
        .await;

    assert_eq!(result.expect("request succeeded"), "order placed");
    assert_eq!(api.call_count("refresh"), 0);
}

#[tokio::test]
async fn unauthorized_refreshes_and_retries_once() {
    let (api, _sink, vault) = vault_with_credential();
    api.queue_refresh(Ok(pair("t2", "r2")));

    let attempts = AtomicU32::new(0);
    let result = vault
        .with_refresh(&api, |token| {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    // the stored t1 has expired server-side
                    Err(ApiError::Unauthorized)
                } else {
                    assert_eq!(token, Some(AccessToken::new("t2")), "retry uses new token");
                    Ok("order placed")
                }
            }
        })
        .await;

    assert_eq!(result.expect("retry succeeded"), "order placed");
    assert_eq!(attempts.load(Ordering::SeqCst), 2, "exactly one retry");
    assert_eq!(api.call_count("refresh"), 1);

    // the rotated pair is persisted in place, profile untouched
    let credential = vault.current().expect("credential kept");
    assert_eq!(credential.access_token, AccessToken::new("t2"));
    assert_eq!(credential.refresh_token, RefreshToken::new("r2"));
    assert_eq!(credential.user.id.as_str(), "u1");
}

#[tokio::test]
async fn invalid_refresh_token_clears_credential_and_emits() {
    let (api, sink, vault) = vault_with_credential();
    api.queue_refresh(Err(ApiError::InvalidRefreshToken));

    let result = vault
        .with_refresh(&api, |_token| async move {
            Err::<(), _>(ApiError::Unauthorized)
        })
        .await;

    assert!(matches!(result, Err(ClientError::AuthExpired)));
    assert!(vault.current().is_none(), "credential cleared");
    assert!(sink.saw(&ClientEvent::SessionEnded));
}

#[tokio::test]
async fn network_failure_during_refresh_keeps_credential() {
    let (api, sink, vault) = vault_with_credential();
    api.queue_refresh(Err(ApiError::Network("timeout".to_owned())));

    let result = vault
        .with_refresh(&api, |_token| async move {
            Err::<(), _>(ApiError::Unauthorized)
        })
        .await;

    assert!(matches!(result, Err(ClientError::TransientNetwork(_))));

    let credential = vault.current().expect("credential untouched");
    assert_eq!(credential.access_token, AccessToken::new("t1"));
    assert_eq!(credential.refresh_token, RefreshToken::new("r1"));
    assert!(!sink.saw(&ClientEvent::SessionEnded));
}

#[tokio::test]
async fn retry_unauthorized_does_not_refresh_again() {
    let (api, _sink, vault) = vault_with_credential();
    api.queue_refresh(Ok(pair("t2", "r2")));

    let result = vault
        .with_refresh(&api, |_token| async move {
            Err::<(), _>(ApiError::Unauthorized)
        })
        .await;

    // one refresh, one retry, then the failure surfaces - no loop
    assert!(matches!(result, Err(ClientError::Rejected(_))));
    assert_eq!(api.call_count("refresh"), 1);

    // the session is kept: the refresh itself was accepted
    assert!(vault.current().is_some());
}

#[tokio::test]
async fn unauthenticated_request_proceeds_without_bearer() {
    let api = MockApi::new();
    let sink = Arc::new(RecordingSink::new());
    let vault = CredentialVault::new(StoreHandle::memory(), sink);

    let result = vault
        .with_refresh(&api, |token| async move {
            assert_eq!(token, None, "no credential, request runs unauthenticated");
            Ok::<_, ApiError>("public data")
        })
        .await;

    assert_eq!(result.expect("request succeeded"), "public data");
}

#[tokio::test]
async fn non_auth_errors_pass_through_unmapped_to_refresh() {
    let (api, _sink, vault) = vault_with_credential();

    let result = vault
        .with_refresh(&api, |_token| async move {
            Err::<(), _>(ApiError::Rejected("out of stock".to_owned()))
        })
        .await;

    assert!(matches!(result, Err(ClientError::Rejected(_))));
    assert_eq!(api.call_count("refresh"), 0);
}

#[test]
fn clear_is_idempotent() {
    let (_api, sink, vault) = vault_with_credential();

    vault.clear();
    vault.clear();

    assert!(vault.current().is_none());
    let ended = sink
        .events()
        .iter()
        .filter(|event| **event == ClientEvent::SessionEnded)
        .count();
    assert_eq!(ended, 1, "second clear emits nothing");
}

#[test]
fn attach_auth_decorates_request_when_signed_in() {
    let (_api, _sink, vault) = vault_with_credential();

    let client = reqwest::Client::new();
    let request = vault
        .attach_auth(client.get("https://api.sungrove.test/orders"))
        .build()
        .expect("request builds");

    let header = request
        .headers()
        .get("authorization")
        .expect("bearer attached");
    assert_eq!(header.to_str().expect("ascii"), "Bearer t1");
}

#[test]
fn attach_auth_leaves_request_untouched_when_signed_out() {
    let sink = Arc::new(RecordingSink::new());
    let vault = CredentialVault::new(StoreHandle::memory(), sink);

    let client = reqwest::Client::new();
    let request = vault
        .attach_auth(client.get("https://api.sungrove.test/orders"))
        .build()
        .expect("request builds");

    assert!(request.headers().get("authorization").is_none());
}

//! End-to-end scenarios through the session context.

use sungrove_client::api::ApiError;
use sungrove_client::{AdminAccess, AuthPhase, ClientError, ClientEvent};

use sungrove_integration_tests::{TestContext, grant, product};

#[tokio::test]
async fn full_customer_journey() {
    let mut ctx = TestContext::new();

    // browse anonymously, cart edits work without a session
    ctx.session
        .cart_mut()
        .add_item(&product("candle", "18.00"), 1)
        .expect("add");
    assert_eq!(ctx.session.auth().phase(), AuthPhase::Anonymous);

    // sign in over OTP
    ctx.api.queue_send_otp(Ok(()));
    ctx.session.request_otp("a@b.com").await.expect("otp sent");

    ctx.api.queue_verify_otp(Ok(grant("t1", "r1", "u1")));
    ctx.session
        .verify_otp("a@b.com", "123456", Some("Ada"))
        .await
        .expect("verified");
    assert!(ctx.session.auth().is_authenticated());

    // the cart survived the sign-in untouched
    assert_eq!(ctx.session.cart().totals().item_count, 1);

    // an authenticated call carries the bearer and succeeds
    let placed = ctx
        .session
        .authenticated(|token| async move {
            assert!(token.is_some());
            Ok::<_, ApiError>("order-1")
        })
        .await
        .expect("order placed");
    assert_eq!(placed, "order-1");

    // sign out
    ctx.session.logout().expect("logged out");
    assert_eq!(ctx.session.auth().phase(), AuthPhase::Anonymous);
    assert!(ctx.sink.saw(&ClientEvent::SessionEnded));
}

#[tokio::test]
async fn otp_retry_after_wrong_code() {
    let mut ctx = TestContext::new();

    ctx.api.queue_send_otp(Ok(()));
    ctx.session.request_otp("a@b.com").await.expect("otp sent");

    ctx.api
        .queue_verify_otp(Err(ApiError::Rejected("invalid code".to_owned())));
    let wrong = ctx.session.verify_otp("a@b.com", "1234", None).await;
    assert!(matches!(wrong, Err(ClientError::Rejected(_))));
    assert_eq!(ctx.session.auth().phase(), AuthPhase::OtpRequested);

    ctx.api.queue_verify_otp(Ok(grant("t1", "r1", "u1")));
    ctx.session
        .verify_otp("a@b.com", "5678", None)
        .await
        .expect("second code accepted");
    assert!(ctx.session.auth().is_authenticated());
}

#[tokio::test]
async fn admin_surface_is_independent_of_customer_session() {
    let mut ctx = TestContext::new();

    // customer signs in
    ctx.api.queue_send_otp(Ok(()));
    ctx.session.request_otp("a@b.com").await.expect("otp sent");
    ctx.api.queue_verify_otp(Ok(grant("t1", "r1", "u1")));
    ctx.session
        .verify_otp("a@b.com", "123456", None)
        .await
        .expect("verified");

    // the admin gate is still closed
    assert_eq!(ctx.session.admin_check(), AdminAccess::RedirectToLogin);

    // admin logs in over the separate trust boundary
    ctx.api.queue_admin_login(Ok(grant("at1", "ar1", "admin-1")));
    ctx.session
        .admin_login("ops@example.com", &secrecy::SecretString::from("hunter2"))
        .await
        .expect("admin in");
    assert!(matches!(ctx.session.admin_check(), AdminAccess::Granted(_)));

    // customer logout does not end the admin session, and vice versa
    ctx.session.logout().expect("customer out");
    assert!(matches!(ctx.session.admin_check(), AdminAccess::Granted(_)));

    ctx.session.admin_logout();
    assert_eq!(ctx.session.admin_check(), AdminAccess::RedirectToLogin);
}

#[tokio::test]
async fn expired_session_redirects_instead_of_rendering_empty() {
    let mut ctx = TestContext::new();

    ctx.api.queue_send_otp(Ok(()));
    ctx.session.request_otp("a@b.com").await.expect("otp sent");
    ctx.api.queue_verify_otp(Ok(grant("t1", "r1", "u1")));
    ctx.session
        .verify_otp("a@b.com", "123456", None)
        .await
        .expect("verified");

    // the backend revokes the session: refresh token is rejected
    ctx.api.queue_refresh(Err(ApiError::InvalidRefreshToken));
    let result = ctx
        .session
        .authenticated(|_token| async move { Err::<(), _>(ApiError::Unauthorized) })
        .await;

    assert!(matches!(result, Err(ClientError::AuthExpired)));
    assert!(ctx.sink.saw(&ClientEvent::SessionEnded));
    assert!(
        ctx.session.auth().vault().current().is_none(),
        "credential cleared so views redirect instead of rendering empty data"
    );

    // cart edits keep working; only the session was destroyed
    ctx.session
        .cart_mut()
        .add_item(&product("soap", "6.00"), 2)
        .expect("cart unaffected");
}

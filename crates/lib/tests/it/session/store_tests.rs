//! SessionStore expiry, renewal and invalidation.

use chrono::Duration;
use gatehouse::{
    Clock, SessionValidator,
    session::store::{generate_session_token, session_id_for_token},
    user::UserStatus,
};

use crate::helpers::TestContext;

#[tokio::test]
async fn tokens_are_random_and_url_safe() {
    let a = generate_session_token();
    let b = generate_session_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), 27);
    assert!(
        a.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
}

#[tokio::test]
async fn store_keeps_only_the_token_hash() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = generate_session_token();

    let session = ctx.sessions.create_session(&token, &user.id).await;

    assert_eq!(session.id, session_id_for_token(&token));
    assert_ne!(session.id, token);
    assert_eq!(session.id.len(), 64);
    assert_eq!(session.expires_at, ctx.clock.now() + Duration::days(30));
}

#[tokio::test]
async fn validation_returns_session_and_user() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    let validation = ctx.sessions.validate_session_token(&token).await.unwrap();
    assert_eq!(validation.user, Some(user.clone()));
    assert_eq!(validation.session.unwrap().user_id, user.id);
}

#[tokio::test]
async fn session_expires_at_exact_deadline() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    ctx.clock.advance(Duration::days(30) - Duration::seconds(1));
    assert!(
        ctx.sessions
            .validate_session_token(&token)
            .await
            .unwrap()
            .user
            .is_some()
    );

    // The validation above renewed it; jump past the renewed deadline
    ctx.clock.advance(Duration::days(30));
    let validation = ctx.sessions.validate_session_token(&token).await.unwrap();
    assert!(validation.user.is_none());
    assert!(validation.session.is_none());
}

#[tokio::test]
async fn fresh_session_is_not_renewed() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = generate_session_token();
    let created = ctx.sessions.create_session(&token, &user.id).await;

    ctx.advance_days(10);

    let session = ctx
        .sessions
        .validate_session_token(&token)
        .await
        .unwrap()
        .session
        .unwrap();
    assert_eq!(session.expires_at, created.expires_at);
}

#[tokio::test]
async fn session_inside_renewal_window_is_extended() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = generate_session_token();
    let created = ctx.sessions.create_session(&token, &user.id).await;

    ctx.advance_days(20);

    let session = ctx
        .sessions
        .validate_session_token(&token)
        .await
        .unwrap()
        .session
        .unwrap();
    assert!(session.expires_at > created.expires_at);
    assert_eq!(session.expires_at, ctx.clock.now() + Duration::days(30));

    // Still alive well past the original deadline
    ctx.advance_days(25);
    assert!(
        ctx.sessions
            .validate_session_token(&token)
            .await
            .unwrap()
            .user
            .is_some()
    );
}

#[tokio::test]
async fn disabled_user_cannot_use_session() {
    let ctx = TestContext::new();
    let mut user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    user.status = UserStatus::Disabled;
    ctx.users.insert(user).await.unwrap();

    let validation = ctx.sessions.validate_session_token(&token).await.unwrap();
    assert!(validation.user.is_none());
}

#[tokio::test]
async fn invalidate_single_session() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;
    let other = ctx.login(&user).await;

    ctx.sessions
        .invalidate_session(&session_id_for_token(&token))
        .await
        .unwrap();

    assert!(
        ctx.sessions
            .validate_session_token(&token)
            .await
            .unwrap()
            .user
            .is_none()
    );
    assert!(
        ctx.sessions
            .validate_session_token(&other)
            .await
            .unwrap()
            .user
            .is_some()
    );

    let err = ctx
        .sessions
        .invalidate_session(&session_id_for_token(&token))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn invalidate_all_sessions_for_user() {
    let ctx = TestContext::new();
    let alice = ctx.add_user("alice").await;
    let bob = ctx.add_user("bob").await;
    ctx.login(&alice).await;
    ctx.login(&alice).await;
    let bob_token = ctx.login(&bob).await;

    assert_eq!(ctx.sessions.invalidate_user_sessions(&alice.id).await, 2);
    assert_eq!(ctx.sessions.session_count().await, 1);
    assert!(
        ctx.sessions
            .validate_session_token(&bob_token)
            .await
            .unwrap()
            .user
            .is_some()
    );
}

#[tokio::test]
async fn purge_removes_only_expired() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    ctx.login(&user).await;
    ctx.advance_days(29);
    ctx.login(&user).await;
    ctx.advance_days(2);

    assert_eq!(ctx.sessions.purge_expired().await, 1);
    assert_eq!(ctx.sessions.session_count().await, 1);
}

#[tokio::test]
async fn unvalidated_huge_ttl_saturates_instead_of_overflowing() {
    let config = gatehouse::config::SessionConfig {
        ttl: Duration::days(200_000_000),
        renew_threshold: Duration::days(200_000_000),
        ..Default::default()
    };
    let ctx = TestContext::with_config(&config);
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    // Renewal window covers the whole lifetime, so validation also renews
    let validation = ctx.sessions.validate_session_token(&token).await.unwrap();
    let session = validation.session.unwrap();
    assert_eq!(session.expires_at, chrono::DateTime::<chrono::Utc>::MAX_UTC);
    assert_eq!(validation.user, Some(user));
}

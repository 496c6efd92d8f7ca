//! SessionResolver against the in-memory SessionStore.

use gatehouse::{LayoutData, UserView, config::SessionConfig, session::RequestCookies};

use crate::helpers::TestContext;

#[tokio::test]
async fn request_without_cookie_is_anonymous() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    ctx.login(&user).await;

    let data = ctx.resolver.load(&RequestCookies::new()).await.unwrap();
    assert_eq!(data, LayoutData { user: None });
}

#[tokio::test]
async fn logged_in_request_resolves_to_view() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    let data = ctx.resolver.load(&ctx.cookies(&token)).await.unwrap();

    assert_eq!(
        data.user,
        Some(UserView {
            id: user.id.clone(),
            username: "alice".to_string(),
            is_authenticated: true,
        })
    );

    // Email and password hash stay on the server
    let json = serde_json::to_string(&data).unwrap();
    assert!(!json.contains("example.com"));
    assert!(!json.contains("argon2"));
}

#[tokio::test]
async fn tampered_token_is_anonymous() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    let tampered = format!("{token}x");
    let data = ctx.resolver.load(&ctx.cookies(&tampered)).await.unwrap();
    assert!(!data.is_authenticated());
}

#[tokio::test]
async fn raw_header_cookie_jar() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    let header = format!("theme=dark; session={token}");
    let data = ctx
        .resolver
        .load(&RequestCookies::parse(&header))
        .await
        .unwrap();
    assert_eq!(data.user.map(|u| u.username), Some("alice".to_string()));
}

#[tokio::test]
async fn expired_session_is_anonymous() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    ctx.advance_days(31);

    let data = ctx.resolver.load(&ctx.cookies(&token)).await.unwrap();
    assert_eq!(data, LayoutData::anonymous());
    assert_eq!(ctx.sessions.session_count().await, 0);
}

#[tokio::test]
async fn removed_user_is_anonymous() {
    let ctx = TestContext::new();
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    ctx.users.remove(&user.id).await.unwrap();

    let data = ctx.resolver.load(&ctx.cookies(&token)).await.unwrap();
    assert!(!data.is_authenticated());
}

#[tokio::test]
async fn each_request_is_independent() {
    let ctx = TestContext::new();
    let alice = ctx.add_user("alice").await;
    let bob = ctx.add_user("bob").await;
    let alice_token = ctx.login(&alice).await;
    let bob_token = ctx.login(&bob).await;

    let alice_cookies = ctx.cookies(&alice_token);
    let bob_cookies = ctx.cookies(&bob_token);
    let no_cookies = RequestCookies::new();

    let (a, b, none) = tokio::join!(
        ctx.resolver.load(&alice_cookies),
        ctx.resolver.load(&bob_cookies),
        ctx.resolver.load(&no_cookies),
    );

    assert_eq!(a.unwrap().user.unwrap().username, "alice");
    assert_eq!(b.unwrap().user.unwrap().username, "bob");
    assert!(!none.unwrap().is_authenticated());
}

#[tokio::test]
async fn configured_cookie_name_is_used() {
    let config = SessionConfig {
        cookie_name: "app_session".to_string(),
        ..SessionConfig::default()
    };
    let ctx = TestContext::with_config(&config);
    let user = ctx.add_user("alice").await;
    let token = ctx.login(&user).await;

    let wrong_name = RequestCookies::new().with("session", token.clone());
    assert!(!ctx.resolver.load(&wrong_name).await.unwrap().is_authenticated());
    assert!(
        ctx.resolver
            .load(&ctx.cookies(&token))
            .await
            .unwrap()
            .is_authenticated()
    );
}

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use gatehouse::{
    Clock, FixedClock, SessionResolver, SessionStore, User, UserDirectory,
    config::SessionConfig,
    session::{RequestCookies, store::generate_session_token},
};

/// Everything needed to drive a resolver end to end.
pub struct TestContext {
    pub clock: Arc<FixedClock>,
    pub users: UserDirectory,
    pub sessions: SessionStore,
    pub resolver: SessionResolver<SessionStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    pub fn with_config(config: &SessionConfig) -> Self {
        let clock = Arc::new(FixedClock::default());
        let users = UserDirectory::new();
        let sessions = SessionStore::new(Arc::new(users.clone()))
            .with_clock(clock.clone())
            .with_config(config);
        let resolver =
            SessionResolver::new(sessions.clone()).with_cookie_name(config.cookie_name.clone());
        Self {
            clock,
            users,
            sessions,
            resolver,
        }
    }

    /// Register a user and return it.
    pub async fn add_user(&self, username: &str) -> User {
        let user = User::new(username, self.clock.now())
            .with_email(format!("{username}@example.com"))
            .with_password_hash("$argon2id$not-a-real-hash");
        self.users
            .insert(user.clone())
            .await
            .expect("Failed to insert user");
        user
    }

    /// Log a user in and return the cookie value.
    pub async fn login(&self, user: &User) -> String {
        let token = generate_session_token();
        self.sessions.create_session(&token, &user.id).await;
        token
    }

    /// Cookie jar carrying `token` under the resolver's cookie name.
    pub fn cookies(&self, token: &str) -> RequestCookies {
        RequestCookies::new().with(self.resolver.cookie_name(), token)
    }

    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }
}

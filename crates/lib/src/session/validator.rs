//! The session validation capability consumed by the resolver.

use std::sync::Arc;

use async_trait::async_trait;

use super::Session;
use crate::{Result, user::User};

/// Outcome of validating a session token.
///
/// Both fields are `None` when the token is unknown, expired or revoked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionValidation {
    pub session: Option<Session>,
    pub user: Option<User>,
}

impl SessionValidation {
    /// The result for a token that does not identify a live session.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn valid(session: Session, user: User) -> Self {
        Self {
            session: Some(session),
            user: Some(user),
        }
    }
}

/// Resolves an opaque session token to its session and user.
///
/// Implementations own expiry and renewal policy. An `Err` means the
/// validator could not reach its backing store; an unknown or stale token is
/// `Ok(SessionValidation::invalid())`.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate_session_token(&self, token: &str) -> Result<SessionValidation>;
}

#[async_trait]
impl<V: SessionValidator + ?Sized> SessionValidator for Arc<V> {
    async fn validate_session_token(&self, token: &str) -> Result<SessionValidation> {
        (**self).validate_session_token(token).await
    }
}

//! In-memory session storage
//!
//! Maps session ids to [`Session`] records and validates tokens against them.
//! A session id is the hex SHA-256 of its token, so a leaked store does not
//! leak usable cookies. Sessions are ephemeral and lost on restart.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::{Session, SessionError, SessionValidation, SessionValidator};
use crate::{
    Clock, Result, SystemClock,
    config::SessionConfig,
    constants::{SESSION_RENEW_THRESHOLD_DAYS, SESSION_TOKEN_BYTES, SESSION_TTL_DAYS},
    user::UserLookup,
};

/// Generate a fresh random session token for a cookie.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

/// Derive the session id stored server-side for a token.
pub fn session_id_for_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Session store with sliding expiration.
///
/// Cloning is cheap; clones share the same sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    users: Arc<dyn UserLookup>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    renew_threshold: Duration,
}

impl SessionStore {
    /// Create an empty store that resolves session owners through `users`.
    pub fn new(users: Arc<dyn UserLookup>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            users,
            clock: Arc::new(SystemClock),
            ttl: Duration::days(SESSION_TTL_DAYS),
            renew_threshold: Duration::days(SESSION_RENEW_THRESHOLD_DAYS),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Apply lifetime settings from a [`SessionConfig`].
    pub fn with_config(mut self, config: &SessionConfig) -> Self {
        self.ttl = config.ttl;
        self.renew_threshold = config.renew_threshold;
        self
    }

    /// Expiry for a session created or renewed at `now`.
    ///
    /// Saturates at the latest representable instant instead of overflowing.
    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Create a session for a user, keyed by the given token.
    ///
    /// The caller sets `token` as the cookie value; only its hash is kept.
    pub async fn create_session(&self, token: &str, user_id: &str) -> Session {
        let session = Session {
            id: session_id_for_token(token),
            user_id: user_id.to_string(),
            expires_at: self.expiry_from(self.clock.now()),
        };
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        tracing::debug!(user_id, expires_at = %session.expires_at, "Session created");
        session
    }

    /// Remove a single session.
    pub async fn invalidate_session(&self, session_id: &str) -> Result<Session> {
        let removed = self.sessions.write().await.remove(session_id);
        removed.ok_or_else(|| {
            SessionError::SessionNotFound {
                session_id: session_id.to_string(),
            }
            .into()
        })
    }

    /// Remove every session belonging to a user. Returns how many were removed.
    pub async fn invalidate_user_sessions(&self, user_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        before - sessions.len()
    }

    /// Drop all sessions that have expired. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now < s.expires_at);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }
        purged
    }

    /// Number of stored sessions, including ones that expired but were not
    /// yet purged.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionValidator for SessionStore {
    async fn validate_session_token(&self, token: &str) -> Result<SessionValidation> {
        let session_id = session_id_for_token(token);

        let Some(mut session) = self.sessions.read().await.get(&session_id).cloned() else {
            return Ok(SessionValidation::invalid());
        };

        let now = self.clock.now();
        if now >= session.expires_at {
            self.sessions.write().await.remove(&session_id);
            tracing::debug!(user_id = %session.user_id, "Session expired");
            return Ok(SessionValidation::invalid());
        }

        let user = match self.users.find_user(&session.user_id).await? {
            Some(user) if user.is_active() => user,
            Some(_) => {
                tracing::debug!(user_id = %session.user_id, "Session owner is not active");
                return Ok(SessionValidation::invalid());
            }
            None => {
                tracing::debug!(user_id = %session.user_id, "Session owner no longer exists");
                return Ok(SessionValidation::invalid());
            }
        };

        let renew_from = session
            .expires_at
            .checked_sub_signed(self.renew_threshold)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        if now >= renew_from {
            session.expires_at = self.expiry_from(now);
            // The session may have been invalidated while the user was looked up
            if let Some(stored) = self.sessions.write().await.get_mut(&session_id) {
                stored.expires_at = session.expires_at;
                tracing::debug!(user_id = %session.user_id, "Session renewed");
            } else {
                return Ok(SessionValidation::invalid());
            }
        }

        Ok(SessionValidation::valid(session, user))
    }
}

//! Core data types for the user system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record as held by the user directory.
///
/// This carries fields that must never reach presentation code, such as the
/// password hash. Use [`UserView`] for anything handed to the rendering layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique identifier (UUID v4 string)
    pub id: String,

    /// Unique username (login identifier)
    pub username: String,

    /// Contact email, if known
    pub email: Option<String>,

    /// Password hash managed by whatever issues credentials.
    /// None for passwordless users
    pub password_hash: Option<String>,

    /// Account creation time
    pub created_at: DateTime<Utc>,

    /// Account status
    pub status: UserStatus,
}

impl User {
    /// Create an active user with a freshly generated id.
    pub fn new(username: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: None,
            password_hash: None,
            created_at,
            status: UserStatus::Active,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// User account status
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Disabled,
    Locked,
}

/// Minimized projection of a [`User`] for the rendering layer.
///
/// Serializes as `{"id": .., "username": .., "isAuthenticated": true}` and
/// nothing else.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub is_authenticated: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            is_authenticated: true,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_authenticated: true,
        }
    }
}

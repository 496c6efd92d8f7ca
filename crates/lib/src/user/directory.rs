//! In-memory user directory
//!
//! Holds [`User`] records keyed by id. The session store resolves a session's
//! owner through the [`UserLookup`] trait so a persistent directory can be
//! swapped in without touching session code.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{User, UserError};
use crate::Result;

/// Look up users by id.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Returns `Ok(None)` when no user has this id.
    async fn find_user(&self, id: &str) -> Result<Option<User>>;
}

/// Thread-safe in-memory user directory.
///
/// Cloning is cheap; clones share the same underlying map.
#[derive(Clone, Default)]
pub struct UserDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user.
    ///
    /// Usernames are unique across the directory; inserting a second user
    /// with the same username fails and leaves the directory unchanged.
    pub async fn insert(&self, user: User) -> Result<()> {
        if user.username.trim().is_empty() {
            return Err(UserError::InvalidUsername {
                username: user.username,
                reason: "username cannot be empty".to_string(),
            }
            .into());
        }

        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(UserError::UsernameAlreadyExists {
                username: user.username,
            }
            .into());
        }

        tracing::debug!(user_id = %user.id, username = %user.username, "User registered");
        users.insert(user.id.clone(), user);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Remove a user, returning the removed record.
    pub async fn remove(&self, id: &str) -> Result<User> {
        self.users.write().await.remove(id).ok_or_else(|| {
            UserError::UserNotFound {
                id: id.to_string(),
            }
            .into()
        })
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserLookup for UserDirectory {
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.get(id).await)
    }
}

//! Client-side user presence
//!
//! [`PresenceStore`] is an observable holder for the current user's
//! view-model. It is owned by the UI root and handed down explicitly; there is
//! no process-wide instance.
//!
//! The stored record ([`UserData`]) is deliberately loose so partial updates
//! can be merged field by field. Consumers that need to branch on login state
//! should read [`Presence`], which only reports `Authenticated` when the
//! record actually carries an id and a username.

pub mod store;


use serde::{Deserialize, Serialize};

use crate::{session::LayoutData, user::UserView};

pub use store::{PresenceStore, Subscription};

/// The user view-model held by the presence store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl UserData {
    /// `{ isAuthenticated: false }` with nothing else set.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Shallow merge: every field present in `patch` overwrites ours.
    pub fn merge(&mut self, patch: UserPatch) {
        if let Some(id) = patch.id {
            self.id = Some(id);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(username) = patch.username {
            self.username = Some(username);
        }
        if let Some(is_authenticated) = patch.is_authenticated {
            self.is_authenticated = is_authenticated;
        }
    }

    pub fn presence(&self) -> Presence {
        match (self.is_authenticated, &self.id, &self.username) {
            (true, Some(id), Some(username)) => Presence::Authenticated {
                id: id.clone(),
                username: username.clone(),
                email: self.email.clone(),
            },
            _ => Presence::Anonymous,
        }
    }
}

/// A partial [`UserData`]; `None` fields are left untouched by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_authenticated: Option<bool>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn authenticated(mut self, is_authenticated: bool) -> Self {
        self.is_authenticated = Some(is_authenticated);
        self
    }
}

impl From<&UserView> for UserPatch {
    fn from(view: &UserView) -> Self {
        UserPatch::new()
            .id(view.id.clone())
            .username(view.username.clone())
            .authenticated(view.is_authenticated)
    }
}

/// Login state derived from [`UserData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Anonymous,
    Authenticated {
        id: String,
        username: String,
        email: Option<String>,
    },
}

impl Presence {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Presence::Authenticated { .. })
    }
}

impl From<&LayoutData> for Presence {
    fn from(layout: &LayoutData) -> Self {
        match &layout.user {
            Some(user) => Presence::Authenticated {
                id: user.id.clone(),
                username: user.username.clone(),
                email: None,
            },
            None => Presence::Anonymous,
        }
    }
}

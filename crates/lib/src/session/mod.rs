//! Session resolution
//!
//! Turns the session cookie on an inbound request into the [`LayoutData`]
//! handed to the rendering layer.
//!
//! ```text
//! cookie jar ──► SessionResolver ──► SessionValidator ──► { user | null }
//! ```
//!
//! A request without a cookie never reaches the validator. A cookie whose
//! token the validator does not recognise resolves exactly like a request
//! with no cookie at all.

pub mod cookies;
pub mod errors;
pub mod resolver;
pub mod store;
pub mod validator;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserView;

pub use cookies::{CookieSource, RequestCookies};
pub use errors::SessionError;
pub use resolver::SessionResolver;
pub use store::SessionStore;
pub use validator::{SessionValidation, SessionValidator};

/// A live session record.
///
/// `id` is derived from the token by hashing; the raw token is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Data handed from the server to the rendering layer for every page.
///
/// `user` is `None` iff the request had no valid session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutData {
    pub user: Option<UserView>,
}

impl LayoutData {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: UserView) -> Self {
        Self { user: Some(user) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

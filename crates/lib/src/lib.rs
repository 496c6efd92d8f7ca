//!
//! Gatehouse: session-cookie resolution and user presence for server-rendered
//! web applications.
//!
//! ## Core Concepts
//!
//! * **Session resolution (`session::SessionResolver`)**: reads the session cookie on an
//!   inbound request, asks a `session::SessionValidator` about the token, and produces the
//!   `session::LayoutData` handed to the rendering layer: `{ user: { id, username,
//!   isAuthenticated } | null }`. Missing or stale sessions are ordinary anonymous requests,
//!   not errors.
//! * **Session storage (`session::SessionStore`)**: an in-memory validator that stores
//!   hashed session ids with sliding expiration.
//! * **Users (`user::User`, `user::UserView`)**: the full domain record and its minimized
//!   projection. Only `id` and `username` ever cross into the view.
//! * **Presence (`presence::PresenceStore`)**: an observable holder of the client-side user
//!   view-model, with merge-update, clear, and ordered synchronous broadcast to subscribers.
//! * **Configuration (`config`)**: database settings from the environment and session
//!   lifetime settings.

pub mod clock;
pub mod config;
pub mod constants;
pub mod presence;
pub mod session;
pub mod user;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use presence::{Presence, PresenceStore, UserData, UserPatch};
pub use session::{LayoutData, SessionResolver, SessionStore, SessionValidator};
pub use user::{User, UserDirectory, UserView};

/// Result type used throughout the Gatehouse library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Gatehouse library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured session errors from the session module
    #[error(transparent)]
    Session(session::SessionError),

    /// Structured user errors from the user module
    #[error(transparent)]
    User(user::UserError),

    /// Structured configuration errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Session(_) => "session",
            Error::User(_) => "user",
            Error::Config(_) => "config",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Session(session_err) => session_err.is_not_found(),
            Error::User(user_err) => user_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error came from an unreachable or failing backend.
    pub fn is_backend_error(&self) -> bool {
        match self {
            Error::Session(session_err) => session_err.is_backend_error(),
            _ => false,
        }
    }

    /// Check if this error is configuration-related.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

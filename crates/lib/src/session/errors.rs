//! Error types for session handling
use thiserror::Error;

/// Session errors.
///
/// A missing, unknown or expired session is not an error; it resolves to an
/// anonymous request. These variants cover infrastructure failures and
/// explicit operations on sessions that do not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session backend unavailable: {reason}")]
    Backend { reason: String },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },
}

impl SessionError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::SessionNotFound { .. })
    }

    /// Check if this error came from the backing store rather than the caller.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, SessionError::Backend { .. })
    }
}

impl From<SessionError> for crate::Error {
    fn from(err: SessionError) -> Self {
        crate::Error::Session(err)
    }
}

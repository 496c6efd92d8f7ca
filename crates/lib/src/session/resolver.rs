//! Per-request session resolution.

use super::{CookieSource, LayoutData, SessionValidator};
use crate::{Result, constants::SESSION_COOKIE, user::UserView};

/// Maps a request's cookies to the layout data for that request.
///
/// Holds no per-request state; one resolver is shared by every request and
/// each call to [`SessionResolver::load`] starts from scratch.
#[derive(Debug, Clone)]
pub struct SessionResolver<V> {
    validator: V,
    cookie_name: String,
}

impl<V: SessionValidator> SessionResolver<V> {
    /// Create a resolver reading the default [`SESSION_COOKIE`].
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            cookie_name: SESSION_COOKIE.to_string(),
        }
    }

    /// Read the session token from a differently named cookie.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// The raw session token on this request, if any.
    ///
    /// An empty cookie value counts as no cookie.
    pub fn session_token<C: CookieSource + ?Sized>(&self, cookies: &C) -> Option<String> {
        cookies
            .cookie(&self.cookie_name)
            .filter(|token| !token.is_empty())
    }

    /// Resolve the request's user.
    ///
    /// Returns `Ok` with `user: None` when there is no session cookie or the
    /// validator does not recognise the token. Only a validator failure is
    /// returned as `Err`.
    pub async fn load<C: CookieSource + ?Sized>(&self, cookies: &C) -> Result<LayoutData> {
        let Some(token) = self.session_token(cookies) else {
            tracing::debug!(cookie = %self.cookie_name, "No session cookie; anonymous request");
            return Ok(LayoutData::anonymous());
        };

        let validation = self.validator.validate_session_token(&token).await?;

        let Some(user) = validation.user else {
            tracing::debug!("Session token did not resolve to a user; anonymous request");
            return Ok(LayoutData::anonymous());
        };

        tracing::debug!(user_id = %user.id, "Resolved authenticated request");
        Ok(LayoutData::authenticated(UserView::from(user)))
    }
}

//! Session cookie helpers for the web interface.

use tower_cookies::{Cookie, cookie::SameSite};

use gatehouse::config::SessionConfig;

/// Build the cookie that carries a freshly issued session token.
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.cookie_name.clone(), token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(config.secure_cookie);
    cookie
}

/// Cookie used to remove the session cookie from the browser.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.cookie_name.clone(), "");
    cookie.set_path("/");
    cookie
}

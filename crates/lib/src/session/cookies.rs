//! Read-only access to a request's cookies.

use std::collections::HashMap;

use tower_cookies::{Cookie, Cookies};

/// Cookie accessor bound to a single request.
pub trait CookieSource {
    /// Value of the named cookie, if the request carries it.
    fn cookie(&self, name: &str) -> Option<String>;
}

impl CookieSource for Cookies {
    fn cookie(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value().to_string())
    }
}

/// Cookies parsed from a raw `Cookie` header.
///
/// When a name repeats, the first occurrence wins, matching how browsers
/// order the more specific cookie first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    values: HashMap<String, String>,
}

impl RequestCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header. Malformed pairs are skipped.
    pub fn parse(header: &str) -> Self {
        let mut values = HashMap::new();
        for cookie in Cookie::split_parse(header).flatten() {
            values
                .entry(cookie.name().to_string())
                .or_insert_with(|| cookie.value().to_string());
        }
        Self { values }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl CookieSource for RequestCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl CookieSource for HashMap<String, String> {
    fn cookie(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

//! Configuration for the database connection and session handling.
//!
//! Database settings come from the environment. Session settings have
//! defaults from [`crate::constants`] and are normally overridden by the
//! binary's CLI arguments.

use std::fmt;

use chrono::Duration;
use thiserror::Error;

use crate::constants::{
    DATABASE_SCHEMA_PATH, DATABASE_URL_VAR, MAX_SESSION_TTL_DAYS, SESSION_COOKIE,
    SESSION_RENEW_THRESHOLD_DAYS, SESSION_TTL_DAYS,
};

/// Errors raised while building configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not set")]
    MissingVar { name: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}

/// SQL dialect of the configured database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    /// Infer the dialect from a connection URL's scheme.
    ///
    /// Anything that is not a Postgres URL is treated as a SQLite location,
    /// which includes bare file paths.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Dialect::Postgres
        } else {
            Dialect::Sqlite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub dialect: Dialect,
    pub schema_path: String,
    pub verbose: bool,
    pub strict: bool,
}

impl DatabaseConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// `DATABASE_URL` must be present and non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar {
                name: DATABASE_URL_VAR.to_string(),
            })?;

        Ok(Self::new(url))
    }

    /// Build from an explicit URL with default options.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            dialect: Dialect::from_url(&url),
            url,
            schema_path: DATABASE_SCHEMA_PATH.to_string(),
            verbose: true,
            strict: true,
        }
    }

    /// The URL with any username and password masked, for logging.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

/// Redact credentials from a connection URL for safe logging.
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            let mut redacted = parsed.clone();
            if !parsed.username().is_empty() {
                let _ = redacted.set_username("***");
            }
            if parsed.password().is_some() {
                let _ = redacted.set_password(Some("***"));
            }
            redacted.to_string()
        }
        // Bare SQLite paths carry no credentials
        Err(_) if !raw.contains('@') => raw.to_string(),
        Err(_) => "***@<unparsable-url>".to_string(),
    }
}

/// Session lifetime and cookie settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure_cookie: bool,
    pub ttl: Duration,
    pub renew_threshold: Duration,
}

impl SessionConfig {
    /// Build a config from whole-day counts.
    ///
    /// Day counts too large to represent are rejected rather than wrapped.
    pub fn from_days(
        cookie_name: impl Into<String>,
        secure_cookie: bool,
        ttl_days: i64,
        renew_days: i64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            cookie_name: cookie_name.into(),
            secure_cookie,
            ttl: days("ttl", ttl_days)?,
            renew_threshold: days("renew_threshold", renew_days)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the renewal window fits inside the session lifetime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cookie_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "cookie_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.ttl <= Duration::zero() {
            return Err(ConfigError::InvalidValue {
                name: "ttl".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.ttl > Duration::days(MAX_SESSION_TTL_DAYS) {
            return Err(ConfigError::InvalidValue {
                name: "ttl".to_string(),
                reason: format!("must not exceed {MAX_SESSION_TTL_DAYS} days"),
            });
        }
        if self.renew_threshold < Duration::zero() || self.renew_threshold > self.ttl {
            return Err(ConfigError::InvalidValue {
                name: "renew_threshold".to_string(),
                reason: format!(
                    "must be between 0 and the session ttl ({} days)",
                    self.ttl.num_days()
                ),
            });
        }
        Ok(())
    }
}

fn days(name: &str, count: i64) -> Result<Duration, ConfigError> {
    Duration::try_days(count).ok_or_else(|| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: format!("{count} days is out of range"),
    })
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE.to_string(),
            secure_cookie: false,
            ttl: Duration::days(SESSION_TTL_DAYS),
            renew_threshold: Duration::days(SESSION_RENEW_THRESHOLD_DAYS),
        }
    }
}

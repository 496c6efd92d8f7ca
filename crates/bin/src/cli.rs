//! CLI argument definitions for the Gatehouse binary.

use clap::{Parser, Subcommand};
use gatehouse::config::{ConfigError, SessionConfig};

/// Gatehouse layout server
#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "Gatehouse: session-cookie resolution for server-rendered apps")]
#[command(version)]
pub struct Cli {
    /// Emit machine-readable JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the layout server
    Serve(ServeArgs),
    /// Check health of a running Gatehouse server
    Health(HealthArgs),
    /// Show the effective database configuration
    Config,
}

/// Arguments for the serve command
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "GATEHOUSE_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "GATEHOUSE_HOST")]
    pub host: String,

    /// Name of the session cookie
    #[arg(long, default_value = gatehouse::constants::SESSION_COOKIE, env = "GATEHOUSE_COOKIE_NAME")]
    pub cookie_name: String,

    /// Mark the session cookie Secure (HTTPS only)
    #[arg(long, env = "GATEHOUSE_SECURE_COOKIE")]
    pub secure_cookie: bool,

    /// Session lifetime in days
    #[arg(long, default_value_t = gatehouse::constants::SESSION_TTL_DAYS, env = "GATEHOUSE_SESSION_TTL_DAYS")]
    pub session_ttl_days: i64,

    /// Sessions closer than this many days to expiry are extended on use
    #[arg(long, default_value_t = gatehouse::constants::SESSION_RENEW_THRESHOLD_DAYS, env = "GATEHOUSE_SESSION_RENEW_DAYS")]
    pub session_renew_days: i64,

    /// Register this user at startup and log a session token for it
    #[arg(long)]
    pub demo_user: Option<String>,
}

impl ServeArgs {
    /// Session settings derived from the arguments.
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        SessionConfig::from_days(
            self.cookie_name.clone(),
            self.secure_cookie,
            self.session_ttl_days,
            self.session_renew_days,
        )
    }
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "GATEHOUSE_URL")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}

//! Constants used throughout the Gatehouse library.

/// Default name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// How long a freshly created or renewed session stays valid.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Upper bound accepted for a configured session lifetime.
pub const MAX_SESSION_TTL_DAYS: i64 = 100 * 365;

/// Sessions closer than this to their expiry are extended on validation.
pub const SESSION_RENEW_THRESHOLD_DAYS: i64 = 15;

/// Random bytes in a generated session token.
pub const SESSION_TOKEN_BYTES: usize = 20;

/// Environment variable holding the database connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Location of the schema definition handed to the migration tool.
pub const DATABASE_SCHEMA_PATH: &str = "./src/lib/server/db/schema.ts";

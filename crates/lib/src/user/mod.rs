//! User system for Gatehouse
//!
//! Domain user records, their minimized view-model for presentation code, and
//! an in-memory directory the session store resolves users through.

pub mod directory;
pub mod errors;
pub mod types;

pub use directory::{UserDirectory, UserLookup};
pub use errors::UserError;
pub use types::*;

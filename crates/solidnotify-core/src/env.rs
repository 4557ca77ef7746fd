//! Environment variable handling.

use std::env;

/// Well-known environment variable names.
pub mod vars {
    /// Override for the config file location.
    pub const SOLIDNOTIFY_CONFIG: &str = "SOLIDNOTIFY_CONFIG";

    /// Default variable holding a bearer token for authenticated negotiation.
    pub const SOLIDNOTIFY_TOKEN: &str = "SOLIDNOTIFY_TOKEN";
}

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

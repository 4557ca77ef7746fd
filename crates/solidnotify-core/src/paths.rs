//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the solidnotify config directory (`<config dir>/solidnotify`).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine config directory".to_string())
    })?;
    Ok(dir.join("solidnotify"))
}

/// Get the config file path, honoring `SOLIDNOTIFY_CONFIG`.
pub fn config_file() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::get_var(env::vars::SOLIDNOTIFY_CONFIG) {
        return Ok(expand_tilde(&path));
    }
    Ok(base_dir()?.join("config.json5"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

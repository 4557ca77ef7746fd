//! Configuration loading and persistence.

use super::NotifyConfig;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;
use url::Url;

impl NotifyConfig {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from the default path, falling back to defaults if no file exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::load_default() {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer; JSON is valid JSON5
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.gateway_url() {
            errors.push(e.to_string());
        }
        if let Err(e) = self.host_url() {
            errors.push(e.to_string());
        }

        if self.features.ttl == Some(0) {
            errors.push("Feature ttl must be greater than 0".to_string());
        }
        if self.features.rate == Some(0) {
            errors.push("Feature rate must be greater than 0".to_string());
        }

        if self.auth.token_env.trim().is_empty() {
            errors.push("auth.token_env must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// The configured gateway as a URL.
    pub fn gateway_url(&self) -> Result<Option<Url>, ConfigError> {
        parse_absolute("gateway", self.gateway.as_deref())
    }

    /// The configured discovery host as a URL.
    pub fn host_url(&self) -> Result<Option<Url>, ConfigError> {
        parse_absolute("host", self.host.as_deref())
    }
}

fn parse_absolute(field: &str, value: Option<&str>) -> Result<Option<Url>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => Url::parse(raw).map(Some).map_err(|e| {
            ConfigError::Validation(format!("{} '{}' is not an absolute URL: {}", field, raw, e))
        }),
    }
}

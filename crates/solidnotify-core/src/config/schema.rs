//! Configuration schema definitions.

use crate::env;
use crate::types::FeatureOptions;
use serde::{Deserialize, Serialize};

/// Main solidnotify configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Pre-known negotiation gateway; skips discovery when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    /// Host whose well-known document advertises the gateway.
    /// Defaults to the topic's origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Features requested for every subscription.
    #[serde(default)]
    pub features: FeatureOptions,

    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Live subscription settings.
    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

/// Authentication configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Name of the environment variable holding a bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
        }
    }
}

impl AuthConfig {
    /// Read the bearer token from the configured variable, if set.
    pub fn token(&self) -> Option<String> {
        env::get_var(&self.token_env)
    }
}

fn default_token_env() -> String {
    env::vars::SOLIDNOTIFY_TOKEN.to_string()
}

/// Live subscription configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Subprotocol to request when connecting to a caller-supplied endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocol: Option<String>,
}

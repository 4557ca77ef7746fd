//! CLI command implementations.

pub mod config;
pub mod discover;
pub mod negotiate;
pub mod subscribe;

use anyhow::Context;
use clap::Args;
use solidnotify_client::NotificationOptions;
use solidnotify_core::{NotifyConfig, Topic};
use std::path::Path;
use url::Url;

/// Topic and negotiation flags shared by the network commands.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Topic URL to subscribe to
    pub topic: String,

    /// Notification gateway; skips well-known discovery
    #[arg(long)]
    pub gateway: Option<Url>,

    /// Host whose well-known document advertises the gateway
    #[arg(long)]
    pub host: Option<Url>,

    /// Requested subscription lifetime in seconds
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Minimum interval between notifications in seconds
    #[arg(long)]
    pub rate: Option<u64>,

    /// Last known resource state
    #[arg(long)]
    pub state: Option<String>,

    /// Activity type filter
    #[arg(long)]
    pub filter: Option<String>,
}

impl TargetArgs {
    /// Parse the topic.
    pub fn topic(&self) -> anyhow::Result<Topic> {
        Topic::parse(&self.topic).with_context(|| format!("Invalid topic URL: {}", self.topic))
    }

    /// Build notification options from config, with flags taking precedence.
    pub fn options(&self, config: &NotifyConfig) -> anyhow::Result<NotificationOptions> {
        let mut options = NotificationOptions::from_config(config)?;

        if let Some(gateway) = &self.gateway {
            options.gateway = Some(gateway.clone());
        }
        if let Some(host) = &self.host {
            options.host = Some(host.clone());
        }
        if let Some(ttl) = self.ttl {
            options.features.ttl = Some(ttl);
        }
        if let Some(rate) = self.rate {
            options.features.rate = Some(rate);
        }
        if let Some(state) = &self.state {
            options.features.state = Some(state.clone());
        }
        if let Some(filter) = &self.filter {
            options.features.filter = Some(filter.clone());
        }

        Ok(options)
    }
}

/// Load config from an explicit path, or the default path if it exists.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<NotifyConfig> {
    let config = match path {
        Some(path) => NotifyConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => NotifyConfig::load_or_default()?,
    };
    Ok(config)
}

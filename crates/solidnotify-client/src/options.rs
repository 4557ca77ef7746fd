//! Construction options for notifications.

use crate::http::{HttpTransport, ReqwestTransport};
use crate::socket::WebSocketConnector;
use crate::Result;
use solidnotify_core::{FeatureOptions, NotifyConfig};
use std::sync::Arc;
use url::Url;

/// Options accepted when constructing a notification.
#[derive(Debug, Clone, Default)]
pub struct NotificationOptions {
    /// Pre-known gateway; skips well-known discovery.
    pub gateway: Option<Url>,

    /// Host consulted for discovery; defaults to the topic's origin.
    pub host: Option<Url>,

    /// Features forwarded verbatim into negotiation.
    pub features: FeatureOptions,

    /// HTTP transport; defaults to an unauthenticated [`ReqwestTransport`].
    pub fetch: Option<Arc<dyn HttpTransport>>,

    /// WebSocket connector; defaults to [`crate::TungsteniteConnector`].
    pub connector: Option<Arc<dyn WebSocketConnector>>,
}

impl NotificationOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from file configuration.
    ///
    /// A bearer token found in the configured environment variable makes
    /// negotiation authenticated.
    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        config.validate()?;

        let mut options = Self {
            gateway: config.gateway_url()?,
            host: config.host_url()?,
            features: config.features.clone(),
            fetch: None,
            connector: None,
        };

        if let Some(token) = config.auth.token() {
            options.fetch = Some(Arc::new(ReqwestTransport::with_bearer_token(&token)?));
        }

        Ok(options)
    }

    /// Set the gateway.
    pub fn with_gateway(mut self, gateway: Url) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the discovery host.
    pub fn with_host(mut self, host: Url) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the requested features.
    pub fn with_features(mut self, features: FeatureOptions) -> Self {
        self.features = features;
        self
    }

    /// Set the HTTP transport.
    pub fn with_fetch(mut self, fetch: Arc<dyn HttpTransport>) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// Set the WebSocket connector.
    pub fn with_connector(mut self, connector: Arc<dyn WebSocketConnector>) -> Self {
        self.connector = Some(connector);
        self
    }
}

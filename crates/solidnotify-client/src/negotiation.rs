//! Negotiation client.
//!
//! Turns a topic into a live connection descriptor:
//!
//! 1. resolve the gateway from the host's well-known document (memoized),
//! 2. POST the acceptable protocols and feature names to the gateway,
//! 3. POST the topic and feature values to the endpoint it returned.
//!
//! Every step is a single round trip; failures are returned immediately.

use crate::discovery::find_gateway;
use crate::error::NotificationError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::options::NotificationOptions;
use crate::Result;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use solidnotify_core::types::well_known_url;
use solidnotify_core::{
    ConnectionInfo, ConnectionRequest, FeatureOptions, FetchError, NegotiationInfo,
    NegotiationRequest, NotSupported, Topic,
};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

const ACCEPT_LD_JSON: &str = "application/ld+json";
const ACCEPT_JSON: &str = "application/json";

/// Client for the two-step notification negotiation.
#[derive(Debug)]
pub struct NegotiationClient {
    topic: Topic,
    host: Url,
    protocols: Vec<String>,
    features: FeatureOptions,
    gateway: RwLock<Option<Url>>,
    fetch: Arc<dyn HttpTransport>,
}

impl NegotiationClient {
    /// Create a client for a topic, accepting the given protocols.
    pub fn new(topic: Topic, protocols: Vec<String>, options: NotificationOptions) -> Result<Self> {
        let host = match options.host {
            Some(host) => host,
            None => topic.root_domain()?,
        };
        let fetch = options
            .fetch
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        Ok(Self {
            topic,
            host,
            protocols,
            features: options.features,
            gateway: RwLock::new(options.gateway),
            fetch,
        })
    }

    /// The subscribed topic.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// The host whose well-known document is consulted.
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Acceptable protocols, most preferred first.
    pub fn protocols(&self) -> &[String] {
        &self.protocols
    }

    /// Requested features.
    pub fn features(&self) -> &FeatureOptions {
        &self.features
    }

    /// The gateway, if supplied or already discovered.
    pub fn gateway(&self) -> Option<Url> {
        self.gateway.read().clone()
    }

    /// Resolve the negotiation gateway.
    ///
    /// Returns the known gateway without any request once one is set.
    /// A well-known document that cannot be retrieved or that advertises
    /// no gateway yields [`NotSupported`].
    pub async fn resolve_gateway(&self) -> Result<Url> {
        if let Some(gateway) = self.gateway() {
            return Ok(gateway);
        }

        let url = well_known_url(&self.host)?;
        debug!("Discovering notification gateway from {}", url);

        let request = HttpRequest::get(url.clone()).with_header("Accept", ACCEPT_LD_JSON);
        let response = self
            .fetch
            .execute(request)
            .await
            .map_err(NotSupported::caused_by)?;

        if !response.is_success() {
            let error = fetch_error("GET", &response, "negotiation gateway url");
            return Err(NotSupported::caused_by(error).into());
        }

        let document: serde_json::Value = response
            .parse_json()
            .map_err(NotSupported::caused_by)?;

        let discovered = find_gateway(&document, &response.url).ok_or_else(NotSupported::new)?;

        // First writer wins so a known gateway never changes.
        let gateway = {
            let mut slot = self.gateway.write();
            slot.get_or_insert(discovered).clone()
        };
        info!("Using notification gateway {}", gateway);
        Ok(gateway)
    }

    /// Negotiate a protocol with the gateway.
    pub async fn negotiate_protocol(&self) -> Result<NegotiationInfo> {
        let gateway = self.resolve_gateway().await?;
        let body = NegotiationRequest::new(&self.protocols, &self.features);

        let info: NegotiationInfo = self
            .post_json(gateway, &body, "protocol negotiation info")
            .await?;
        debug!(
            "Gateway offered {} via {}",
            info.protocol.as_deref().unwrap_or("unspecified protocol"),
            info.endpoint
        );
        Ok(info)
    }

    /// Negotiate a concrete connection for the topic.
    pub async fn negotiate_connection(&self) -> Result<ConnectionInfo> {
        let NegotiationInfo { endpoint, .. } = self.negotiate_protocol().await?;
        let body = ConnectionRequest {
            topic: &self.topic,
            features: &self.features,
        };

        let info: ConnectionInfo = self.post_json(endpoint, &body, "connection info").await?;
        debug!(
            "Negotiated connection {} (subprotocol: {})",
            info.endpoint,
            info.subprotocol.as_deref().unwrap_or("none")
        );
        Ok(info)
    }

    async fn post_json<B, T>(&self, url: Url, body: &B, description: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::post_json(url, body)?.with_header("Accept", ACCEPT_JSON);
        let response = self.fetch.execute(request).await?;

        if !response.is_success() {
            return Err(fetch_error("POST", &response, description).into());
        }

        response
            .parse_json()
            .map_err(|e| NotificationError::invalid_response(description, e))
    }
}

fn fetch_error(method: &str, response: &HttpResponse, description: &str) -> FetchError {
    FetchError::new(
        method,
        response.url.as_str(),
        response.status,
        response.status_text.as_str(),
        description,
    )
    .with_body(response.content_type.as_deref(), response.text())
}

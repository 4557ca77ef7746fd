//! Negotiation wire documents.

use super::{FeatureOptions, Topic};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

/// Protocol identifier for WebSocket transports.
pub const PROTOCOL_WS: &str = "ws";

/// Body of the protocol negotiation POST sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationRequest {
    /// Acceptable protocols, most preferred first.
    pub protocols: Vec<String>,

    /// Names of the requested features.
    pub features: Vec<String>,
}

impl NegotiationRequest {
    /// Build a request for the given protocols and features.
    pub fn new(protocols: &[String], features: &FeatureOptions) -> Self {
        Self {
            protocols: protocols.to_vec(),
            features: features.names(),
        }
    }
}

/// Gateway response describing where to negotiate a concrete connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationInfo {
    /// Endpoint accepting the connection negotiation POST.
    pub endpoint: Url,

    /// Protocol chosen by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Features granted by the gateway, as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<serde_json::Value>,
}

/// Body of the connection negotiation POST.
///
/// Serializes as one flat object: `topic`, then every set feature. The
/// topic key always carries the topic, whatever `features.extra` holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRequest<'a> {
    /// Topic being subscribed to.
    pub topic: &'a Topic,

    /// Feature values, written next to the topic.
    pub features: &'a FeatureOptions,
}

impl Serialize for ConnectionRequest<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let features = self.features;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("topic", self.topic)?;
        if let Some(state) = &features.state {
            map.serialize_entry("state", state)?;
        }
        if let Some(ttl) = features.ttl {
            map.serialize_entry("ttl", &ttl)?;
        }
        if let Some(rate) = features.rate {
            map.serialize_entry("rate", &rate)?;
        }
        if let Some(filter) = &features.filter {
            map.serialize_entry("filter", filter)?;
        }
        for (name, value) in features.extra_features() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Final descriptor used to open the live transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Live transport URI (e.g. `wss://...`).
    pub endpoint: Url,

    /// Protocol of the live transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Subprotocol to request when opening the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocol: Option<String>,
}

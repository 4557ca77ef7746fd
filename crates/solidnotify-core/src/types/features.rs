//! Protocol feature options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys owned by the connection request itself; never taken from `extra`.
const RESERVED_NAMES: [&str; 5] = ["topic", "state", "ttl", "rate", "filter"];

/// Optional protocol features requested during negotiation.
///
/// Set values are forwarded verbatim into the connection request; the
/// names of set features are listed in the protocol negotiation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureOptions {
    /// Include resource state (e.g. an ETag) in notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Requested subscription lifetime, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,

    /// Minimum interval between notifications, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<u64>,

    /// Server-side notification filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Features this library does not know about.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FeatureOptions {
    /// Create an empty feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request state inclusion.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Request a time-to-live.
    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Request a rate limit.
    pub fn with_rate(mut self, rate: u64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Request a filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Request a feature by name.
    ///
    /// Names of typed features and `topic` are ignored; use the typed
    /// builders for those.
    pub fn with_extra(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        let name = name.into();
        if !is_reserved(&name) {
            self.extra.insert(name, value);
        }
        self
    }

    /// Untyped features, without any entry shadowing a reserved key.
    pub fn extra_features(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.extra.iter().filter(|(name, _)| !is_reserved(name))
    }

    /// Names of every feature that has a value.
    pub fn names(&self) -> Vec<String> {
        let known = [
            ("state", self.state.is_some()),
            ("ttl", self.ttl.is_some()),
            ("rate", self.rate.is_some()),
            ("filter", self.filter.is_some()),
        ];

        known
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| name.to_string())
            .chain(self.extra_features().map(|(name, _)| name.clone()))
            .collect()
    }

    /// Check if no feature is requested.
    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

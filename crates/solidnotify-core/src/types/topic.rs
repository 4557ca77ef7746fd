//! Subscription topics and well-known discovery locations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Path of the Solid well-known configuration document.
pub const WELL_KNOWN_SOLID_PATH: &str = "/.well-known/solid";

/// Absolute URI of the resource or container being subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(Url);

impl Topic {
    /// Parse a topic from an absolute URI.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    /// Get the topic as a URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Get the topic as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The storage host serving this topic.
    pub fn root_domain(&self) -> Result<Url, url::ParseError> {
        root_domain(&self.0)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Topic {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Url> for Topic {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

/// Origin (scheme, host and non-default port) of a URL.
pub fn root_domain(url: &Url) -> Result<Url, url::ParseError> {
    Url::parse(&url.origin().ascii_serialization())
}

/// Location of the Solid well-known document for a host.
pub fn well_known_url(host: &Url) -> Result<Url, url::ParseError> {
    host.join(WELL_KNOWN_SOLID_PATH)
}

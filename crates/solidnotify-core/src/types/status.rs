//! Connection status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a live notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No transport is open.
    #[default]
    Closed,
    /// `connect()` is negotiating or opening the transport.
    Connecting,
    /// The transport is open.
    Connected,
    /// Reserved.
    Closing,
}

impl ConnectionStatus {
    /// Get the status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

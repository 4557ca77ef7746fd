//! Notification error types.

use solidnotify_core::error::BoxError;
use solidnotify_core::{ConfigError, FetchError, NotImplementedError, NotSupported};
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that can occur while negotiating or running a live notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A negotiation request completed with a non-success status.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The server does not advertise a notification gateway.
    #[error(transparent)]
    NotSupported(#[from] NotSupported),

    /// The operation is not provided by this live notification type.
    #[error(transparent)]
    NotImplemented(#[from] NotImplementedError),

    /// The HTTP request could not be completed at all.
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        /// Request URL.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: BoxError,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// A success response carried a body that could not be decoded.
    #[error("Invalid {description} response: {source}")]
    InvalidResponse {
        /// What was being fetched.
        description: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// WebSocket transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NotificationError {
    /// Create an HTTP transport error.
    pub fn http(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Http {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(description: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidResponse {
            description: description.into(),
            source,
        }
    }

    /// Check if this error means the server will never offer notifications.
    pub fn is_capability_gap(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }

    /// Check if this error is retriable.
    ///
    /// Nothing in this crate retries; this only informs a caller's policy.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::Fetch(e) => e.is_transient(),
            Self::WebSocket(e) => matches!(
                e,
                tungstenite::Error::Io(_)
                    | tungstenite::Error::ConnectionClosed
                    | tungstenite::Error::AlreadyClosed
            ),
            _ => false,
        }
    }
}

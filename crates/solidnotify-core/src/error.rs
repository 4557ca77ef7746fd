//! Error types for solidnotify core.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error used as the cause of a capability gap.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON5 parse error: {0}")]
    Json5(String),
}

/// Machine-readable problem details (RFC 9457) returned by a server
/// alongside an error status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,

    /// Short, human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI identifying this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Try to read problem details from a response body.
    ///
    /// Only JSON content types are considered, and the document must carry
    /// at least a `title` or a `detail`.
    pub fn from_body(content_type: Option<&str>, body: &str) -> Option<Self> {
        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);
        if !is_json || body.trim().is_empty() {
            return None;
        }

        let problem: ProblemDetails = serde_json::from_str(body).ok()?;
        if problem.title.is_none() && problem.detail.is_none() {
            return None;
        }
        Some(problem)
    }

    fn summary(&self) -> Option<String> {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => Some(format!("{}: {}", title, detail)),
            (Some(title), None) => Some(title.clone()),
            (None, Some(detail)) => Some(detail.clone()),
            (None, None) => None,
        }
    }
}

/// A negotiation request that completed with a non-success status.
#[derive(Debug, Clone)]
pub struct FetchError {
    /// HTTP method of the failed request.
    pub method: String,

    /// URL the server reported for the response.
    pub url: String,

    /// Response status code.
    pub status: u16,

    /// Response status text (canonical reason phrase).
    pub status_text: String,

    /// What was being fetched, e.g. "protocol negotiation info".
    pub description: String,

    /// Raw response body.
    pub body: String,

    /// Structured problem details, if the server sent any.
    pub problem: Option<ProblemDetails>,
}

impl FetchError {
    /// Create a fetch error without a body.
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            status,
            status_text: status_text.into(),
            description: description.into(),
            body: String::new(),
            problem: None,
        }
    }

    /// Attach the response body, extracting problem details when present.
    pub fn with_body(mut self, content_type: Option<&str>, body: impl Into<String>) -> Self {
        self.body = body.into();
        self.problem = ProblemDetails::from_body(content_type, &self.body);
        self
    }

    /// Check whether the status is one a caller may reasonably retry.
    pub fn is_transient(&self) -> bool {
        matches!(self.status, 408 | 429) || (500..600).contains(&self.status)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = self
            .problem
            .as_ref()
            .and_then(ProblemDetails::summary)
            .unwrap_or_else(|| self.status_text.clone());
        write!(
            f,
            "Unable to fetch {}: {} returned [{}] {}",
            self.description, self.url, self.status, reason
        )
    }
}

impl std::error::Error for FetchError {}

/// The target server does not advertise a notification gateway.
#[derive(Debug, Default)]
pub struct NotSupported {
    cause: Option<BoxError>,
}

impl NotSupported {
    /// Create a capability gap without an underlying cause.
    pub fn new() -> Self {
        Self { cause: None }
    }

    /// Create a capability gap caused by another failure.
    pub fn caused_by(cause: impl Into<BoxError>) -> Self {
        Self {
            cause: Some(cause.into()),
        }
    }

    /// The failure that revealed the gap, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for NotSupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The server appears to not support notifications")?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for NotSupported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// A live-notification operation was invoked on a type that does not
/// provide it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NotImplementedError {
    message: String,
}

impl NotImplementedError {
    /// Create with a custom message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for NotImplementedError {
    fn default() -> Self {
        Self::new("Not implemented by base class")
    }
}

//! HTTP transport used for gateway discovery and negotiation.
//!
//! The transport is a capability injected at construction. Applications
//! that need authenticated negotiation supply their own implementation (or a
//! [`ReqwestTransport`] carrying default headers); otherwise an
//! unauthenticated client is used.

use crate::error::NotificationError;
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use solidnotify_core::ConfigError;
use std::fmt;
use tracing::debug;
use url::Url;

/// HTTP methods used by the negotiation client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Get the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,

    /// Target URL.
    pub url: Url,

    /// Request headers.
    pub headers: Vec<(String, String)>,

    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a GET request.
    pub fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Create a POST request with a JSON body.
    pub fn post_json<T: Serialize + ?Sized>(url: Url, body: &T) -> Result<Self> {
        let body = serde_json::to_vec(body)?;
        Ok(Self {
            method: HttpMethod::Post,
            url,
            headers: vec![(CONTENT_TYPE.as_str().to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL of the response.
    pub url: Url,

    /// Status code.
    pub status: u16,

    /// Status text.
    pub status_text: String,

    /// Content-Type header, if any.
    pub content_type: Option<String>,

    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response with a JSON body.
    pub fn json(url: Url, status: u16, body: &serde_json::Value) -> Self {
        Self {
            url,
            status,
            status_text: String::new(),
            content_type: Some("application/json".to_string()),
            body: Bytes::from(body.to_string()),
        }
    }

    /// Check if the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn parse_json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Capability for executing HTTP requests.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Execute a request.
    ///
    /// Non-success statuses are returned as responses; only failures to
    /// obtain a response at all are errors.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create an unauthenticated transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Create a transport that sends a bearer token with every request.
    pub fn with_bearer_token(token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ConfigError::Validation("Bearer token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NotificationError::http(request.url.as_str(), e))?;

        let status = response.status();
        let url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| NotificationError::http(url.as_str(), e))?;

        Ok(HttpResponse {
            url,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

//! WebSocket opener.
//!
//! Opening a socket is a capability injected at construction, so hosts can
//! swap the TLS stack or route through a proxy without touching the
//! notification state machine.

use crate::Result;
use async_trait::async_trait;
use futures::{Sink, Stream, StreamExt};
use std::fmt::Debug;
use std::pin::Pin;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, SEC_WEBSOCKET_PROTOCOL};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::debug;
use url::Url;

/// Outgoing half of an open socket.
pub type SocketSink = Pin<Box<dyn Sink<Message, Error = WsError> + Send>>;

/// Incoming half of an open socket.
pub type SocketStream = Pin<Box<dyn Stream<Item = std::result::Result<Message, WsError>> + Send>>;

/// Capability for opening WebSocket connections.
#[async_trait]
pub trait WebSocketConnector: Send + Sync + Debug {
    /// Complete the opening handshake and return the split socket.
    async fn open(&self, endpoint: &Url, subprotocol: Option<&str>)
        -> Result<(SocketSink, SocketStream)>;
}

/// Default connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl WebSocketConnector for TungsteniteConnector {
    async fn open(
        &self,
        endpoint: &Url,
        subprotocol: Option<&str>,
    ) -> Result<(SocketSink, SocketStream)> {
        let mut request = endpoint.as_str().into_client_request()?;
        if let Some(subprotocol) = subprotocol {
            let value =
                HeaderValue::from_str(subprotocol).map_err(|e| WsError::HttpFormat(e.into()))?;
            request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, value);
        }

        let (socket, response) = tokio_tungstenite::connect_async(request).await?;
        debug!(
            "WebSocket handshake with {} completed ({})",
            endpoint,
            response.status()
        );

        let (sink, stream) = socket.split();
        Ok((Box::pin(sink), Box::pin(stream)))
    }
}

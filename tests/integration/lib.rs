//! Shared fixtures for solidnotify integration tests.

use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// What a test WebSocket server observed during the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Handshake {
    /// Request path and query.
    pub path_and_query: String,
    /// Requested subprotocol, echoed back to the client.
    pub subprotocol: Option<String>,
}

/// A single-connection WebSocket server.
pub struct WsServer {
    /// Base address, e.g. `ws://127.0.0.1:1234`.
    pub base: Url,
    handshake: Arc<Mutex<Option<Handshake>>>,
    task: JoinHandle<()>,
}

impl WsServer {
    /// Accept one connection, send `frames`, then wait for the client to close.
    pub async fn start(frames: Vec<Message>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = Url::parse(&format!("ws://{}", listener.local_addr().unwrap())).unwrap();
        let handshake = Arc::new(Mutex::new(None));

        let seen = handshake.clone();
        let task = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut observed = Handshake::default();
            let mut ws = tokio_tungstenite::accept_hdr_async(
                stream,
                |req: &Request, mut resp: Response| {
                    observed.path_and_query = req
                        .uri()
                        .path_and_query()
                        .map(|p| p.to_string())
                        .unwrap_or_default();
                    if let Some(proto) = req.headers().get(SEC_WEBSOCKET_PROTOCOL) {
                        observed.subprotocol = proto.to_str().ok().map(str::to_string);
                        resp.headers_mut()
                            .insert(SEC_WEBSOCKET_PROTOCOL, proto.clone());
                    }
                    Ok(resp)
                },
            )
            .await
            .unwrap();
            *seen.lock().await = Some(observed);

            for frame in frames {
                ws.send(frame).await.unwrap();
            }
            while let Some(Ok(_)) = ws.next().await {}
        });

        Self {
            base,
            handshake,
            task,
        }
    }

    /// URL for a path on this server.
    pub fn url(&self, path_and_query: &str) -> Url {
        self.base.join(path_and_query).unwrap()
    }

    /// Wait for the client to close the connection and return the handshake.
    pub async fn finished(self) -> Option<Handshake> {
        self.task.await.unwrap();
        self.handshake.lock().await.clone()
    }
}

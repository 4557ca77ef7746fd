//! Live notifications over a WebSocket.
//!
//! `connect` negotiates an endpoint when none is supplied, opens the socket
//! and hands its read half to a background task. The task decodes text
//! frames as JSON and emits them on `message`; it emits `error` on
//! transport failures and `closed` exactly once when the socket ends.
//!
//! Status flow: `closed -> connecting -> connected -> closed`. A failed
//! negotiation leaves the status at `connecting`; a failed handshake
//! returns it to `closed`. There is no automatic reconnection.

use crate::emitter::{EventEmitter, NotificationEvent};
use crate::live::LiveNotification;
use crate::negotiation::NegotiationClient;
use crate::options::NotificationOptions;
use crate::socket::{SocketSink, SocketStream, TungsteniteConnector, WebSocketConnector};
use crate::Result;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use solidnotify_core::{ConnectionStatus, FeatureOptions, Topic, PROTOCOL_WS};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

/// The open socket owned by a notification.
struct SocketHandle {
    endpoint: Url,
    subprotocol: Option<String>,
    close_tx: oneshot::Sender<()>,
}

/// A notification subscription delivered over a WebSocket.
pub struct WebsocketNotification {
    negotiation: NegotiationClient,
    connector: Arc<dyn WebSocketConnector>,
    emitter: Arc<EventEmitter>,
    status: Arc<RwLock<ConnectionStatus>>,

    /// Bumped on every connect; a reader task only updates the status while
    /// its generation is current.
    generation: Arc<AtomicU64>,

    socket: Mutex<Option<SocketHandle>>,
}

impl fmt::Debug for WebsocketNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebsocketNotification")
            .field("topic", self.negotiation.topic())
            .field("status", &self.status())
            .field("endpoint", &self.endpoint())
            .finish()
    }
}

impl WebsocketNotification {
    /// Create a notification for a topic.
    pub fn new(topic: Topic, mut options: NotificationOptions) -> Result<Self> {
        let connector = options
            .connector
            .take()
            .unwrap_or_else(|| Arc::new(TungsteniteConnector));
        let negotiation = NegotiationClient::new(topic, vec![PROTOCOL_WS.to_string()], options)?;

        Ok(Self {
            negotiation,
            connector,
            emitter: Arc::new(EventEmitter::new()),
            status: Arc::new(RwLock::new(ConnectionStatus::Closed)),
            generation: Arc::new(AtomicU64::new(0)),
            socket: Mutex::new(None),
        })
    }

    /// Create a notification for a topic given as a string.
    pub fn parse(topic: &str, options: NotificationOptions) -> Result<Self> {
        Self::new(Topic::parse(topic)?, options)
    }

    /// The negotiation client backing this notification.
    pub fn negotiation(&self) -> &NegotiationClient {
        &self.negotiation
    }

    pub fn topic(&self) -> &Topic {
        self.negotiation.topic()
    }

    pub fn host(&self) -> &Url {
        self.negotiation.host()
    }

    pub fn gateway(&self) -> Option<Url> {
        self.negotiation.gateway()
    }

    pub fn features(&self) -> &FeatureOptions {
        self.negotiation.features()
    }

    pub fn protocols(&self) -> &[String] {
        self.negotiation.protocols()
    }

    /// Endpoint of the open socket, if any.
    pub fn endpoint(&self) -> Option<Url> {
        self.socket.lock().as_ref().map(|s| s.endpoint.clone())
    }

    /// Subprotocol requested for the open socket, if any.
    pub fn subprotocol(&self) -> Option<String> {
        self.socket
            .lock()
            .as_ref()
            .and_then(|s| s.subprotocol.clone())
    }

    fn set_status(&self, status: ConnectionStatus) {
        *self.status.write() = status;
    }

    /// Ask the reader task of the current socket to close it.
    fn close_socket(&self) -> bool {
        let Some(handle) = self.socket.lock().take() else {
            return false;
        };
        debug!("Closing WebSocket to {}", handle.endpoint);
        // The reader may already have exited on a peer close.
        let _ = handle.close_tx.send(());
        true
    }
}

#[async_trait]
impl LiveNotification for WebsocketNotification {
    fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    fn status(&self) -> ConnectionStatus {
        *self.status.read()
    }

    async fn connect(&self, endpoint: Option<Url>, subprotocol: Option<String>) -> Result<()> {
        self.close_socket();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_status(ConnectionStatus::Connecting);

        let (endpoint, subprotocol) = match endpoint {
            Some(endpoint) => (endpoint, subprotocol),
            None => {
                let info = self.negotiation.negotiate_connection().await?;
                (info.endpoint, info.subprotocol.or(subprotocol))
            }
        };

        info!("Opening WebSocket to {}", endpoint);
        let (sink, stream) = match self.connector.open(&endpoint, subprotocol.as_deref()).await {
            Ok(halves) => halves,
            Err(e) => {
                if self.generation.load(Ordering::SeqCst) == generation {
                    self.set_status(ConnectionStatus::Closed);
                }
                return Err(e);
            }
        };

        let (close_tx, close_rx) = oneshot::channel();
        let previous = self.socket.lock().replace(SocketHandle {
            endpoint: endpoint.clone(),
            subprotocol,
            close_tx,
        });
        if let Some(previous) = previous {
            let _ = previous.close_tx.send(());
        }

        self.set_status(ConnectionStatus::Connected);
        self.emitter.emit(&NotificationEvent::Connected);

        tokio::spawn(read_socket(
            ReaderState {
                endpoint,
                emitter: self.emitter.clone(),
                status: self.status.clone(),
                generation: self.generation.clone(),
                own_generation: generation,
            },
            sink,
            stream,
            close_rx,
        ));

        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        if self.close_socket() {
            self.set_status(ConnectionStatus::Closed);
        }
        Ok(())
    }
}

struct ReaderState {
    endpoint: Url,
    emitter: Arc<EventEmitter>,
    status: Arc<RwLock<ConnectionStatus>>,
    generation: Arc<AtomicU64>,
    own_generation: u64,
}

impl ReaderState {
    fn handle_frame(&self, frame: Message) {
        match frame {
            Message::Text(text) => match serde_json::from_str(&text) {
                Ok(value) => {
                    self.emitter.emit(&NotificationEvent::Message(value));
                }
                Err(e) => warn!(
                    "Discarding notification from {} that is not JSON: {}",
                    self.endpoint, e
                ),
            },
            Message::Binary(data) => warn!(
                "Discarding binary frame ({} bytes) from {}",
                data.len(),
                self.endpoint
            ),
            _ => {}
        }
    }
}

/// Drive the read half of a socket until it closes.
async fn read_socket(
    state: ReaderState,
    mut sink: SocketSink,
    mut stream: SocketStream,
    mut close_rx: oneshot::Receiver<()>,
) {
    let mut closing = false;

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                // Keep reading so the close reply is flushed.
                Some(Ok(Message::Close(frame))) => {
                    debug!("WebSocket to {} closing: {:?}", state.endpoint, frame);
                    closing = true;
                }
                Some(Ok(frame)) => state.handle_frame(frame),
                Some(Err(e)) => {
                    if closing {
                        debug!("WebSocket to {} ended while closing: {}", state.endpoint, e);
                    } else {
                        warn!("WebSocket to {} failed: {}", state.endpoint, e);
                        state.emitter.emit(&NotificationEvent::Error(e.into()));
                    }
                    break;
                }
                None => break,
            },
            // Also fires when the owning notification is dropped.
            _ = &mut close_rx, if !closing => {
                closing = true;
                if let Err(e) = sink.close().await {
                    debug!("Failed to send close to {}: {}", state.endpoint, e);
                    break;
                }
            }
        }
    }

    if state.generation.load(Ordering::SeqCst) == state.own_generation {
        *state.status.write() = ConnectionStatus::Closed;
    }
    info!("WebSocket to {} closed", state.endpoint);
    state.emitter.emit(&NotificationEvent::Closed);
}

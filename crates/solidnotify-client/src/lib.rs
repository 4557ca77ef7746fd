//! Solid notifications client.
//!
//! This crate resolves a live notification endpoint for a topic through the
//! storage server's notification gateway and delivers notifications over a
//! WebSocket as events.
//!
//! ```no_run
//! use solidnotify_client::{EventKind, LiveNotification, NotificationOptions, WebsocketNotification};
//!
//! # async fn run() -> solidnotify_client::Result<()> {
//! let notification =
//!     WebsocketNotification::parse("https://pod.example/container/", NotificationOptions::new())?;
//! notification.on(EventKind::Message, |event| println!("{:?}", event));
//! notification.connect(None, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod emitter;
pub mod error;
pub mod http;
pub mod live;
pub mod negotiation;
pub mod options;
pub mod socket;
pub mod websocket;

pub use emitter::{EventEmitter, EventKind, Listener, ListenerId, NotificationEvent};
pub use error::NotificationError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use live::LiveNotification;
pub use negotiation::NegotiationClient;
pub use options::NotificationOptions;
pub use socket::{SocketSink, SocketStream, TungsteniteConnector, WebSocketConnector};
pub use websocket::WebsocketNotification;

pub use solidnotify_core::{
    ConnectionInfo, ConnectionStatus, FeatureOptions, NegotiationInfo, NegotiationRequest, Topic,
};

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotificationError>;

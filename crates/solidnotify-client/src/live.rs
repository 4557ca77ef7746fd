//! Transport-independent live notification contract.

use crate::emitter::{EventEmitter, EventKind, ListenerId, NotificationEvent};
use crate::Result;
use async_trait::async_trait;
use solidnotify_core::{ConnectionStatus, NotImplementedError};
use std::fmt::Debug;
use url::Url;

/// A subscription that delivers notifications as events.
///
/// Implementors supply the emitter and override both [`connect`] and
/// [`disconnect`]; the provided versions fail with
/// [`NotImplementedError`].
///
/// [`connect`]: LiveNotification::connect
/// [`disconnect`]: LiveNotification::disconnect
#[async_trait]
pub trait LiveNotification: Send + Sync + Debug {
    /// Get the emitter events are delivered through.
    fn emitter(&self) -> &EventEmitter;

    /// Get the current connection status.
    fn status(&self) -> ConnectionStatus {
        ConnectionStatus::Closed
    }

    /// Open the live transport.
    ///
    /// Without an endpoint the implementation negotiates one.
    async fn connect(&self, endpoint: Option<Url>, subprotocol: Option<String>) -> Result<()> {
        let _ = (endpoint, subprotocol);
        Err(NotImplementedError::default().into())
    }

    /// Close the live transport.
    fn disconnect(&self) -> Result<()> {
        Err(NotImplementedError::default().into())
    }

    /// Register a listener for every event of a kind.
    fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&NotificationEvent) + Send + Sync + 'static,
        Self: Sized,
    {
        self.emitter().on(kind, listener)
    }

    /// Register a listener for the next event of a kind.
    fn once<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&NotificationEvent) + Send + Sync + 'static,
        Self: Sized,
    {
        self.emitter().once(kind, listener)
    }

    /// Remove a listener.
    fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        self.emitter().off(kind, id)
    }
}

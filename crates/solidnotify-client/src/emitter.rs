//! Observer registry for notification events.
//!
//! Listeners are keyed by [`EventKind`] and invoked synchronously, in
//! registration order. Each emission works on a snapshot of the registry,
//! so listeners may add or remove listeners (including themselves) while
//! being invoked; a listener runs at most once per emission.

use crate::error::NotificationError;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Names of the events a live notification emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Closed,
    Error,
    Message,
}

impl EventKind {
    /// Get the event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Closed => "closed",
            Self::Error => "error",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered to listeners.
#[derive(Debug)]
pub enum NotificationEvent {
    /// The transport opened.
    Connected,
    /// The transport closed.
    Closed,
    /// The transport reported an error.
    Error(NotificationError),
    /// A decoded notification arrived.
    Message(serde_json::Value),
}

impl NotificationEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connected => EventKind::Connected,
            Self::Closed => EventKind::Closed,
            Self::Error(_) => EventKind::Error,
            Self::Message(_) => EventKind::Message,
        }
    }

    /// Decode a message payload into a caller-chosen type.
    pub fn message_as<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        match self {
            Self::Message(value) => Some(T::deserialize(value)),
            _ => None,
        }
    }
}

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener callback.
pub type Listener = Arc<dyn Fn(&NotificationEvent) + Send + Sync>;

struct Registration {
    id: ListenerId,
    kind: EventKind,
    once: bool,
    listener: Listener,
}

/// Registry of event listeners.
pub struct EventEmitter {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Registration>>,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Register a listener for every event of a kind.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&NotificationEvent) + Send + Sync + 'static,
    {
        self.register(kind, false, Arc::new(listener))
    }

    /// Register a listener for the next event of a kind only.
    pub fn once<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&NotificationEvent) + Send + Sync + 'static,
    {
        self.register(kind, true, Arc::new(listener))
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|r| !(r.kind == kind && r.id == id));
        listeners.len() != before
    }

    /// Remove every listener of a kind, or all listeners.
    pub fn remove_all_listeners(&self, kind: Option<EventKind>) {
        let mut listeners = self.listeners.lock();
        match kind {
            Some(kind) => listeners.retain(|r| r.kind != kind),
            None => listeners.clear(),
        }
    }

    /// Number of listeners registered for a kind.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Deliver an event to its listeners. Returns how many were invoked.
    pub fn emit(&self, event: &NotificationEvent) -> usize {
        let kind = event.kind();

        // Snapshot, dropping once-listeners before they run.
        let snapshot: Vec<Listener> = {
            let mut listeners = self.listeners.lock();
            let mut fired = Vec::new();
            listeners.retain(|r| {
                if r.kind != kind {
                    return true;
                }
                fired.push(Arc::clone(&r.listener));
                !r.once
            });
            fired
        };

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    fn register(&self, kind: EventKind, once: bool, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(Registration {
            id,
            kind,
            once,
            listener,
        });
        id
    }
}

//! # Broadcast Channel
//!
//! Fan-out of state-changed events to every currently subscribed listener.
//!
//! - No replay: a listener only sees events published after it subscribed.
//! - FIFO per listener: publishes are serialized, so every listener observes
//!   events in the order `publish` was called.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::errors::{RealtimeError, RealtimeResult};
use super::event::StateChangedEvent;

/// Event sender for a listener
pub type EventSender = mpsc::UnboundedSender<StateChangedEvent>;

/// Event receiver for a listener
pub type EventReceiver = mpsc::UnboundedReceiver<StateChangedEvent>;

/// Identity of one subscribed listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by `subscribe`
#[derive(Debug)]
pub struct Listener {
    id: ListenerId,
    receiver: EventReceiver,
}

impl Listener {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Wait for the next event. `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<StateChangedEvent> {
        self.receiver.recv().await
    }

    /// Next already-delivered event, if any
    pub fn try_recv(&mut self) -> Option<StateChangedEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Result of publishing an event
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Listeners the event was handed to
    pub delivered: usize,
    /// Listeners found closed and removed
    pub pruned: usize,
}

/// Publish/subscribe interface used by the sync service
pub trait NotificationChannel: Send + Sync + fmt::Debug {
    /// Deliver `event` to every currently subscribed listener
    fn publish(&self, event: &StateChangedEvent) -> RealtimeResult<DispatchResult>;

    /// Join the channel
    fn subscribe(&self) -> RealtimeResult<Listener>;

    /// Leave the channel
    fn unsubscribe(&self, id: ListenerId) -> RealtimeResult<()>;
}

/// In-process broadcast channel over unbounded per-listener queues
#[derive(Debug, Default)]
pub struct Broadcaster {
    listeners: Mutex<HashMap<ListenerId, EventSender>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get listener count
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

impl NotificationChannel for Broadcaster {
    fn publish(&self, event: &StateChangedEvent) -> RealtimeResult<DispatchResult> {
        let mut listeners = self.listeners.lock().map_err(|_| RealtimeError::lock_poisoned())?;
        let mut result = DispatchResult::default();

        // Receivers dropped without unsubscribing are pruned here
        listeners.retain(|_, sender| match sender.send(event.clone()) {
            Ok(()) => {
                result.delivered += 1;
                true
            }
            Err(_) => {
                result.pruned += 1;
                false
            }
        });

        Ok(result)
    }

    fn subscribe(&self) -> RealtimeResult<Listener> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ListenerId::new();

        self.listeners
            .lock()
            .map_err(|_| RealtimeError::lock_poisoned())?
            .insert(id, tx);

        Ok(Listener { id, receiver: rx })
    }

    fn unsubscribe(&self, id: ListenerId) -> RealtimeResult<()> {
        let mut listeners = self.listeners.lock().map_err(|_| RealtimeError::lock_poisoned())?;
        listeners
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RealtimeError::ListenerNotFound(id.to_string()))
    }
}

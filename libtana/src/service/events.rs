//! Tick and change notifications
//!
//! Presentation code refreshes countdowns on a periodic tick and re-renders
//! when the snapshot changes. Both signals travel over one broadcast bus;
//! emitting never blocks, and events are dropped when nobody subscribes.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast bus distributing [`Event`]s to any number of subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a bus with the given per-subscriber buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// Non-blocking; a send with no receivers is fine and simply drops
    /// the event.
    pub fn emit(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers (debugging/metrics only)
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events emitted by the inventory service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Periodic sweep tick; countdown displays should recompute
    Tick { now_ms: i64 },

    /// The snapshot was mutated and persisted
    SnapshotChanged { users: usize, items: usize },
}

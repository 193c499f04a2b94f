//! Event bus using tokio broadcast channel
//!
//! Non-blocking emission with multiple subscribers.
//! Slow subscribers miss events rather than blocking senders.

use tokio::sync::broadcast;

use crate::types::StorageEvent;

/// Default channel capacity
pub const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for storage notifications
///
/// Events are fire-and-forget; with no subscribers they are dropped.
pub struct EventBus {
    sender: broadcast::Sender<StorageEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new event bus with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of subscribers that will see it.
    pub fn emit(&self, event: StorageEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Subscriber to event bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<StorageEvent>,
}

impl EventSubscriber {
    /// Receive the next event
    ///
    /// Returns None once every bus handle is dropped.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event subscriber lagged by {} events", n);
                    continue;
                }
            }
        }
    }
}

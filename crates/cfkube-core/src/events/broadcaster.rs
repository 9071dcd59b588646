//! Event broadcaster for store change events.
//!
//! Uses tokio's broadcast channel so several subscribers can follow the same
//! stream of mutations.

use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{StoreEvent, StoreOperation};

/// Default buffer size for the broadcast channel.
/// Events beyond this limit will cause older events to be dropped for slow receivers.
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Broadcaster for store events.
///
/// Cheap to clone; all clones share the same channel.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBroadcaster {
    /// Create a new broadcaster with default buffer size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new broadcaster with custom buffer size.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new broadcaster wrapped in an Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Send an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns 0 if there are no active subscribers.
    pub fn send(&self, event: StoreEvent) -> usize {
        self.sender.send(event).unwrap_or_default()
    }

    /// Build and send an event for the given operation.
    pub fn send_operation(
        &self,
        operation: StoreOperation,
        resource_guid: impl Into<String>,
        space_guid: impl Into<String>,
    ) -> usize {
        self.send(StoreEvent::new(operation, resource_guid, space_guid))
    }

    /// Subscribe to events.
    ///
    /// Events sent before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Check if there are any active subscribers.
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroadcaster")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

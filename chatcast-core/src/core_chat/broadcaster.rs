//! Event Broadcasting System
//!
//! Fans change events out to every connected client. Delivery is best
//! effort: a send with no receivers is dropped, lagging receivers skip
//! events and nobody gets a replay.

use super::events::ChangeEvent;
use crate::metrics::BROADCAST_RECEIVERS;
use tokio::sync::broadcast;
use tracing::debug;

/// Destination for change events produced by the mutation service
///
/// `publish` must not block and has no way to fail the mutation.
pub trait BroadcastSink: Send + Sync {
    fn publish(&self, event: ChangeEvent);
}

/// Broadcast sink backed by a tokio broadcast channel
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<ChangeEvent>,
}

impl EventBroadcaster {
    /// Create a new event broadcaster
    ///
    /// # Arguments
    /// * `capacity` - Number of events buffered per subscriber before it lags
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers
    ///
    /// # Returns
    /// Number of active subscribers that received the event
    pub fn emit(&self, event: ChangeEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => count,
            Err(broadcast::error::SendError(event)) => {
                debug!(event = event.wire_name(), "No subscribers for event");
                0
            }
        }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl BroadcastSink for EventBroadcaster {
    fn publish(&self, event: ChangeEvent) {
        let receivers = self.emit(event);
        ::metrics::gauge!(BROADCAST_RECEIVERS).set(receivers as f64);
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

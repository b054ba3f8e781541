/// In-process change event fan-out
use jukebox_core::{ChangeEvent, EventPublisher};
use tokio::sync::broadcast;

/// Broadcast bus for post-commit change events
///
/// Slow subscribers lag and lose the oldest events rather than blocking
/// publishers.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<ChangeEvent>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: ChangeEvent) {
        let name = event.name();
        let playlist = event.playlist_id().clone();

        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(event = name, %playlist, receivers, "event published");
            }
            Err(_) => {
                tracing::debug!(event = name, %playlist, "no subscribers, event dropped");
            }
        }
    }
}

use tokio::sync::broadcast;
use tracing::trace;

use eventsphere_core::{CartEntry, EventRecord};

pub const DEFAULT_BUS_CAPACITY: usize = 16;

/// A collection changed. Carries the new snapshot so subscribers never have to
/// re-read storage themselves.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    CartUpdated { entries: Vec<CartEntry> },
    FavoritesUpdated { events: Vec<EventRecord> },
}

impl ChangeEvent {
    /// Wire name of the signal, matching the persisted storage keys' owners.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::CartUpdated { .. } => "cartUpdated",
            ChangeEvent::FavoritesUpdated { .. } => "favoritesUpdated",
        }
    }
}

/// In-process bus fanning out collection changes to whatever is observing the
/// session (badge counters, open views). Delivery is fire-and-forget: at most
/// one event per mutating call, no delivery order guarantees between
/// subscribers, and publishing with nobody listening is fine.
pub struct ChangeBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ChangeEvent) {
        trace!(kind = event.kind(), "publishing change event");
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let bus = ChangeBus::default();
        bus.publish(ChangeEvent::CartUpdated { entries: vec![] });
    }

    #[tokio::test]
    async fn test_all_subscribers_receive_the_snapshot() {
        let bus = ChangeBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(ChangeEvent::FavoritesUpdated { events: vec![] });

        for receiver in [&mut first, &mut second] {
            let event = receiver.recv().await.unwrap();
            assert_eq!(event.kind(), "favoritesUpdated");
        }
    }
}

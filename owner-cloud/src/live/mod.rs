//! LiveHub: per-owner push fan-out
//!
//! ```text
//! ScheduleWorker / owner API
//!       │ LiveEvent
//!       ▼
//! LiveHub
//!   └── owners: owner_id → broadcast::Sender<LiveEvent>
//!         │
//!         ▼
//!   Live WS handler (subscribe → push)
//! ```
//!
//! Events are strictly isolated per owner.

use dashmap::DashMap;
use shared::models::LiveEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel capacity, enough to buffer bursts while a client reconnects
const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone, Default)]
pub struct LiveHub {
    owners: Arc<DashMap<i64, broadcast::Sender<LiveEvent>>>,
}

impl LiveHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish to every subscriber of `owner_id`.
    ///
    /// Returns the number of receivers reached; zero when nobody listens.
    pub fn publish(&self, owner_id: i64, event: LiveEvent) -> usize {
        match self.owners.get(&owner_id) {
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    pub fn subscribe(&self, owner_id: i64) -> broadcast::Receiver<LiveEvent> {
        self.owners
            .entry(owner_id)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    pub fn subscriber_count(&self, owner_id: i64) -> usize {
        self.owners
            .get(&owner_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Drop the owner's channel once the last subscriber is gone
    pub fn prune(&self, owner_id: i64) {
        self.owners
            .remove_if(&owner_id, |_, tx| tx.receiver_count() == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TransitionRule;

    fn opened(restaurant_id: i64) -> LiveEvent {
        LiveEvent::AvailabilityChanged {
            restaurant_id,
            name: format!("r{restaurant_id}"),
            is_open: true,
            rule: Some(TransitionRule::ScheduleOpen),
            at: 0,
        }
    }

    #[tokio::test]
    async fn subscriber_receives_owner_events() {
        let hub = LiveHub::new();
        let mut rx = hub.subscribe(1);

        assert_eq!(hub.publish(1, opened(10)), 1);
        assert_eq!(rx.recv().await.unwrap(), opened(10));
    }

    #[tokio::test]
    async fn owners_are_isolated() {
        let hub = LiveHub::new();
        let mut rx_a = hub.subscribe(1);
        let mut rx_b = hub.subscribe(2);

        hub.publish(2, opened(20));
        hub.publish(1, opened(10));

        assert_eq!(rx_a.recv().await.unwrap().restaurant_id(), 10);
        assert_eq!(rx_b.recv().await.unwrap().restaurant_id(), 20);
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let hub = LiveHub::new();
        assert_eq!(hub.publish(5, opened(1)), 0);
        assert_eq!(hub.subscriber_count(5), 0);
    }

    #[test]
    fn prune_removes_idle_channels_only() {
        let hub = LiveHub::new();
        let rx = hub.subscribe(3);
        hub.prune(3);
        assert_eq!(hub.subscriber_count(3), 1);

        drop(rx);
        hub.prune(3);
        assert_eq!(hub.subscriber_count(3), 0);
        assert!(hub.owners.is_empty());
    }
}

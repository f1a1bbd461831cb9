//! In-process publish/subscribe for change events.
//!
//! [`EventBus`] is an explicitly constructed value, injected into the
//! resolver and the server — there is no global instance, so every test
//! gets an isolated bus. It fans typed [`ChangeEvent`]s out over a tokio
//! broadcast channel; a subscription filters to one [`Topic`].
//!
//! # Delivery semantics
//!
//! - A subscriber receives every matching event published *after* it
//!   subscribed. No replay, no durability.
//! - There is no backpressure: the channel keeps the most recent
//!   `capacity` events, and a subscriber that falls further behind than
//!   that loses the overwritten ones (logged, accepted limitation).
//! - Dropping the subscription is the whole unsubscribe story.

use tallyboard_protocol::{ChangeEvent, Topic};
use tokio::sync::broadcast;

/// Events a subscriber can fall behind before losing the oldest.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Handle to the bus. Cheap to clone; all clones share one channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// A bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// A bus with a specific lag capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcasts an event to every live subscriber.
    ///
    /// Returns how many subscribers there were to receive it. Zero is
    /// not an error — publishing into silence is normal.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let topic = event.topic;
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(%topic, receivers, "change event published");
                receivers
            }
            Err(_) => 0, // no live receivers
        }
    }

    /// Opens a subscription filtered to one topic.
    ///
    /// Only events published after this call are delivered.
    pub fn subscribe(&self, topic: Topic) -> EventSubscription {
        tracing::debug!(%topic, "subscription opened");
        EventSubscription {
            receiver: self.sender.subscribe(),
            topic,
        }
    }

    /// Number of live subscriptions (all topics).
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// One listener's handle. Lives exactly as long as its owner keeps it —
/// for the server, the lifetime of the client connection.
pub struct EventSubscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    topic: Topic,
}

impl EventSubscription {
    /// The topic this subscription filters to.
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Waits for the next matching event.
    ///
    /// Returns `None` once the bus itself is gone (every `EventBus`
    /// clone dropped) — for a server that means shutdown. Events for
    /// other topics are skipped silently; a lag overflow skips the lost
    /// events and keeps receiving.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.topic == self.topic => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, topic = %self.topic, "slow subscriber, events dropped");
                    continue;
                }
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tallyboard_protocol::{PlayerId, PlayerView};

    fn event(topic: Topic, name: &str) -> ChangeEvent {
        ChangeEvent {
            topic,
            player: PlayerView {
                player_id: PlayerId(1),
                name: name.into(),
                score: 10,
                created_at: 0,
                updated_at: 0,
            },
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_matching_event() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe(Topic::UpsertPlayer);

        bus.publish(event(Topic::UpsertPlayer, "Ann"));

        let received = sub.recv().await.expect("bus still open");
        assert_eq!(received.player.name, "Ann");
        assert_eq!(received.topic, Topic::UpsertPlayer);
    }

    #[tokio::test]
    async fn test_subscription_filters_by_topic() {
        let bus = EventBus::new();
        let mut deletes = bus.subscribe(Topic::DeletePlayer);

        bus.publish(event(Topic::UpsertPlayer, "skipped"));
        bus.publish(event(Topic::DeletePlayer, "delivered"));

        // The upsert is skipped; the first thing recv yields is the delete.
        let received = deletes.recv().await.expect("bus still open");
        assert_eq!(received.player.name, "delivered");
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscriber() {
        let bus = EventBus::new();
        bus.publish(event(Topic::UpsertPlayer, "before"));

        let mut sub = bus.subscribe(Topic::UpsertPlayer);
        bus.publish(event(Topic::UpsertPlayer, "after"));

        let received = sub.recv().await.expect("bus still open");
        assert_eq!(received.player.name, "after", "pre-subscribe events must not replay");
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_every_event() {
        let bus = EventBus::new();
        let mut a = bus.subscribe(Topic::UpsertPlayer);
        let mut b = bus.subscribe(Topic::UpsertPlayer);

        let receivers = bus.publish(event(Topic::UpsertPlayer, "Ann"));

        assert_eq!(receivers, 2);
        assert_eq!(a.recv().await.expect("open").player.name, "Ann");
        assert_eq!(b.recv().await.expect("open").player.name, "Ann");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_returns_zero() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(event(Topic::UpsertPlayer, "Ann")), 0);
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_bus_dropped() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe(Topic::UpsertPlayer);

        drop(bus);

        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_subscriber_count_tracks_drops() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let sub = bus.subscribe(Topic::UpsertPlayer);
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_skips_lost_events_and_continues() {
        // Capacity 2: publishing 4 events overwrites the first two.
        let bus = EventBus::with_capacity(2);
        let mut sub = bus.subscribe(Topic::UpsertPlayer);

        for name in ["one", "two", "three", "four"] {
            bus.publish(event(Topic::UpsertPlayer, name));
        }

        // The subscriber lost "one" and "two" but still gets the rest.
        assert_eq!(sub.recv().await.expect("open").player.name, "three");
        assert_eq!(sub.recv().await.expect("open").player.name, "four");
    }
}

//! Broadcast channel for domain events and notifications.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Services
//! publish [`ArenaEvent`]s; every WebSocket connection subscribes on
//! connect and drops its receiver on disconnect, which is the whole
//! subscription lifecycle.

use tokio::sync::broadcast;

use super::{ArenaEvent, Notification};

/// Broadcast bus for [`ArenaEvent`]s.
///
/// When the ring buffer is full, the oldest events are dropped for
/// lagging receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ArenaEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: ArenaEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Publishes a notification.
    pub fn notify(&self, notification: Notification) -> usize {
        self.publish(ArenaEvent::Notification(notification))
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ArenaEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BattleId, NotificationVariant};
    use chrono::Utc;

    fn make_event(battle_id: BattleId) -> ArenaEvent {
        ArenaEvent::BattleExpired {
            battle_id,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(100);
        assert_eq!(bus.publish(make_event(BattleId::new(1))), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_notification() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.notify(Notification::new(
            NotificationVariant::Success,
            "Vote Recorded!",
            "Your vote has been counted.",
        ));

        let Ok(ArenaEvent::Notification(note)) = rx.recv().await else {
            panic!("expected a notification");
        };
        assert_eq!(note.title, "Vote Recorded!");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let id = BattleId::new(3);
        assert_eq!(bus.publish(make_event(id)), 2);

        let (Ok(e1), Ok(e2)) = (rx1.recv().await, rx2.recv().await) else {
            panic!("receivers failed");
        };
        assert_eq!(e1.battle_id(), e2.battle_id());
    }

    #[test]
    fn dropping_receiver_unsubscribes() {
        let bus = EventBus::new(100);
        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}

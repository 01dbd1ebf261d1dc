use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
/// Event bus for pub/sub messaging
///
/// Cloning the bus shares the subscriber list, so the registry and the
/// session manager publish to the same listeners.
use std::sync::Arc;

use super::events::AudioEvent;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    sender: Sender<AudioEvent>,
}

#[derive(Default)]
struct Subscribers {
    list: Vec<Subscriber>,
    next_id: usize,
}

#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<AudioEvent>, SubscriberId) {
        let (tx, rx) = unbounded();

        let mut subscribers = self.subscribers.write();
        let id = SubscriberId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.list.push(Subscriber { id, sender: tx });

        (rx, id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().list.retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: AudioEvent) {
        tracing::trace!("Audio event: {}", event.description());

        // Receivers that were dropped are pruned on the next publish
        let mut closed = Vec::new();
        {
            let subscribers = self.subscribers.read();
            for subscriber in subscribers.list.iter() {
                if subscriber.sender.try_send(event.clone()).is_err() {
                    closed.push(subscriber.id);
                }
            }
        }
        if !closed.is_empty() {
            self.subscribers
                .write()
                .list
                .retain(|s| !closed.contains(&s.id));
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_subscribe() {
        let bus = EventBus::new();
        let (_rx, _id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_event_bus_unsubscribe() {
        let bus = EventBus::new();
        let (_rx, id) = bus.subscribe();
        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new();
        let (rx1, _id1) = bus.subscribe();
        let (rx2, _id2) = bus.subscribe();

        bus.publish(AudioEvent::Paused);

        assert_eq!(rx1.try_recv().unwrap(), AudioEvent::Paused);
        assert_eq!(rx2.try_recv().unwrap(), AudioEvent::Paused);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();
        drop(rx);

        bus.publish(AudioEvent::Resumed);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_bus_clone_shares_subscribers() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let (rx, _id) = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);

        bus2.publish(AudioEvent::Paused);
        assert!(rx.try_recv().is_ok());
    }
}

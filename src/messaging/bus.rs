//! Event bus for pub/sub messaging
//!
//! The session publishes; renderers, audio cues and loggers subscribe.
use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::Arc;

use super::events::Event;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    sender: Sender<Event>,
}

/// Event bus for broadcasting events to subscribers
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<RwLock<usize>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(RwLock::new(0)),
        }
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        let (tx, rx) = unbounded();

        let mut next_id = self.next_id.write();
        let id = SubscriberId(*next_id);
        *next_id += 1;
        drop(next_id);

        self.subscribers.write().push(Subscriber { id, sender: tx });

        (rx, id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers. Subscribers whose receiver was
    /// dropped are removed. Returns how many subscribers got the event.
    pub fn publish(&self, event: Event) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        {
            let subscribers = self.subscribers.read();
            for subscriber in subscribers.iter() {
                match subscriber.sender.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Disconnected(_)) => dead.push(subscriber.id),
                    Err(TrySendError::Full(_)) => {}
                }
            }
        }

        if !dead.is_empty() {
            tracing::debug!("Dropping {} disconnected subscriber(s)", dead.len());
            self.subscribers.write().retain(|s| !dead.contains(&s.id));
        }

        delivered
    }

    /// Publish a batch in order
    pub fn publish_all(&self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            tracing::trace!("Event: {}", event.description());
            self.publish(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn clear(&self) {
        self.subscribers.write().clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

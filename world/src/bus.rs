//! Deterministic publish/subscribe registry for world events.
//!
//! The original design broadcast placement events through a process-wide
//! singleton. Here the bus is an explicit value owned by the session and
//! injected wherever notifications are needed, so test runs never share
//! ambient state. Subscribers are invoked in registration order, which
//! makes event delivery deterministic.

use std::fmt;

use gridstead_core::Event;

type Subscriber = Box<dyn FnMut(&Event)>;

/// Explicit publish point for world event notifications.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer invoked for every subsequently published event.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Delivers a single event to every subscriber in registration order.
    pub fn publish(&mut self, event: &Event) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }

    /// Delivers a batch of events, preserving both batch and subscriber order.
    pub fn publish_all(&mut self, events: &[Event]) {
        for event in events {
            self.publish(event);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

//! Change notifications.
//!
//! Listeners are called synchronously, in subscription order, on the thread
//! that made the mutating call, right after the mutation completes.
//!
//! - [`OptionsEvent::Changed`] after a successful `set`, or after a delete
//!   batch that removed at least one key (once per batch).
//! - [`OptionsEvent::VolumeLoaded`] after every load, successful or not. A
//!   path with no file stem names no volume and is rejected before loading, so
//!   it publishes nothing.
//!
//! Channel subscribers are dropped on the first publish after their receiver
//! goes away.

use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsEvent {
    Changed,
    VolumeLoaded { volume: String, succeeded: bool },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum Listener {
    Callback(Box<dyn FnMut(&OptionsEvent) + Send>),
    Channel(Sender<OptionsEvent>),
}

impl Listener {
    /// Deliver `event`. `false` means the listener is gone for good.
    fn deliver(&mut self, event: &OptionsEvent) -> bool {
        match self {
            Listener::Callback(callback) => {
                callback(event);
                true
            }
            Listener::Channel(tx) => tx.send(event.clone()).is_ok(),
        }
    }
}

#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&OptionsEvent) + Send + 'static,
    {
        self.push(Listener::Callback(Box::new(listener)))
    }

    /// Subscribe a channel. Events are cloned into it until the receiver is
    /// dropped.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<OptionsEvent>) {
        let (tx, rx) = mpsc::channel();
        (self.push(Listener::Channel(tx)), rx)
    }

    fn push(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: &OptionsEvent) {
        self.listeners.retain_mut(|(_, listener)| listener.deliver(event));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn publishes_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers = Subscribers::new();

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            subscribers.subscribe(move |_| seen.lock().unwrap().push(tag));
        }
        subscribers.publish(&OptionsEvent::Changed);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn channel_receives_clones() {
        let mut subscribers = Subscribers::new();
        let (_, rx) = subscribers.subscribe_channel();

        subscribers.publish(&OptionsEvent::VolumeLoaded {
            volume: "Options".into(),
            succeeded: true,
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            OptionsEvent::VolumeLoaded {
                volume: "Options".into(),
                succeeded: true
            }
        );
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut subscribers = Subscribers::new();
        subscribers.subscribe(|_| {});
        for _ in 0..100 {
            let (_, rx) = subscribers.subscribe_channel();
            drop(rx);
        }
        let (_, live) = subscribers.subscribe_channel();
        assert_eq!(subscribers.len(), 102);

        subscribers.publish(&OptionsEvent::Changed);

        assert_eq!(subscribers.len(), 2);
        assert_eq!(live.try_recv().unwrap(), OptionsEvent::Changed);
        assert_eq!(format!("{subscribers:?}"), "Subscribers { listeners: 2 }");
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut subscribers = Subscribers::new();
        let (id, rx) = subscribers.subscribe_channel();

        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        assert!(subscribers.is_empty());

        subscribers.publish(&OptionsEvent::Changed);
        assert!(rx.try_recv().is_err());
    }
}

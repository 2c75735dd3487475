//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from runner tasks, the run group and the supervisor.
//!
//! ```text
//! Publishers (many):                 Subscriber (one):
//!   runner task 1 ──┐
//!   runner task N ──┼──► Bus ───► supervisor listener ───► SubscriberSet
//!   shutdown      ──┘  (broadcast)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: one ring buffer shared by all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if nobody is subscribed at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers; drops it if there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_existing_receivers_only() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::ShutdownStarted));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::RunnerStarting).with_runner("a"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::RunnerStarting);
        assert_eq!(ev.runner.as_deref(), Some("a"));
        assert!(rx.try_recv().is_err());
    }
}

//! # Observing the supervisor.
//!
//! Implement [`Subscribe`] to react to runner failures, closer results and the
//! shutdown sequence. The supervisor feeds each subscriber from its own task, so
//! a slow one delays only itself; events it cannot keep up with are dropped for
//! it alone and show up as `SubscriberOverflow` on the bus.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use appvisor::{Event, EventKind, Subscribe};
//!
//! struct Alerts;
//!
//! #[async_trait]
//! impl Subscribe for Alerts {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::RunnerFailed | EventKind::CloserFailed) {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "alerts" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives supervisor events in publication order.
///
/// `on_event` must not block; a panic is caught and published as
/// `SubscriberPanicked`, and delivery continues.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name reported in `SubscriberOverflow` and `SubscriberPanicked` events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Events buffered for this subscriber before new ones are dropped.
    fn queue_capacity(&self) -> usize {
        1024
    }
}

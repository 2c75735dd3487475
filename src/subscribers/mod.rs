//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! the built-in [`LogWriter`].
//!
//! ```text
//! Bus ──► supervisor listener ──► SubscriberSet::emit(&Event)
//!                                     ├──► [queue] ──► LogWriter
//!                                     └──► [queue] ──► custom subscriber
//! ```

mod embedded;
mod subscriber;
mod subscriber_set;

pub use embedded::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
pub(crate) use subscriber_set::panic_info;

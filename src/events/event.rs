//! # Runtime events emitted by the supervisor.
//!
//! [`EventKind`] classifies events into three groups:
//! - **Runner events**: per-runner lifecycle (starting, stopped, failed)
//! - **Shutdown events**: signal handling, closer release, grace outcome
//! - **Subscriber events**: delivery problems inside the fan-out
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Subscribers run on separate workers, so use `seq` to restore
//! the exact order.
//!
//! ## Example
//! ```rust
//! use appvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::CloserFailed)
//!     .with_closer("log-file")
//!     .with_reason("disk full");
//!
//! assert_eq!(ev.kind, EventKind::CloserFailed);
//! assert_eq!(ev.closer.as_deref(), Some("log-file"));
//! assert_eq!(ev.reason.as_deref(), Some("disk full"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Runner events ===
    /// Runner task spawned.
    ///
    /// Sets: `runner`.
    RunnerStarting,

    /// Runner returned `Ok(())` or `Err(RunnerError::Canceled)`.
    ///
    /// Sets: `runner`.
    RunnerStopped,

    /// Runner returned an error or panicked.
    ///
    /// Sets: `runner`, `reason`.
    RunnerFailed,

    /// Every runner has returned; `run` is about to return.
    ///
    /// Sets: `reason` (first error) when the run failed.
    RunFinished,

    // === Shutdown events ===
    /// Termination signal observed.
    ShutdownRequested,

    /// Runners drained within the configured grace period.
    AllStoppedWithin,

    /// Grace period expired with runners still executing.
    ///
    /// Sets: `timeout_ms`.
    GraceExceeded,

    /// `shutdown` started; the execution context is cancelled.
    ShutdownStarted,

    /// A closer released its resource.
    ///
    /// Sets: `closer`.
    CloserClosed,

    /// A closer returned an error. Shutdown continues with the next closer.
    ///
    /// Sets: `closer`, `reason`.
    CloserFailed,

    /// Every closer has been attempted.
    ShutdownFinished,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `subscriber`, `reason`.
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `subscriber`, `reason`.
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the runner, if applicable.
    pub runner: Option<Arc<str>>,
    /// Name of the closer, if applicable.
    pub closer: Option<Arc<str>>,
    /// Name of the subscriber, if applicable.
    pub subscriber: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Grace period in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            runner: None,
            closer: None,
            subscriber: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches a runner name.
    #[inline]
    pub fn with_runner(mut self, runner: impl Into<Arc<str>>) -> Self {
        self.runner = Some(runner.into());
        self
    }

    /// Attaches a closer name.
    #[inline]
    pub fn with_closer(mut self, closer: impl Into<Arc<str>>) -> Self {
        self.closer = Some(closer.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow).with_reason(reason);
        ev.subscriber = Some(subscriber.into());
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber.into());
        ev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::RunnerStarting);
        let b = Event::new(EventKind::RunnerStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timeout_saturates() {
        let ev = Event::new(EventKind::GraceExceeded).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_overflow_fields() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.subscriber.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("full"));
        assert!(ev.runner.is_none());
    }
}

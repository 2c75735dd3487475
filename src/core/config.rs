//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the supervisor.
//!
//! ## Sentinel values
//! - `grace = 0s` → wait for runners indefinitely after a termination signal

use std::time::Duration;

/// Configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `grace`: Maximum wait for runners to stop after a termination signal (`0s` = no limit)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time [`Supervisor::run_until_shutdown`](crate::Supervisor::run_until_shutdown)
    /// waits for runners after a termination signal before aborting them.
    ///
    /// `run` and `shutdown` never use it: cancellation there is purely cooperative.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the grace period as an `Option`.
    ///
    /// - `None` → wait indefinitely
    /// - `Some(d)` → abort outstanding runners after `d`
    #[inline]
    pub fn grace_limit(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 0s` (cooperative, no limit)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}

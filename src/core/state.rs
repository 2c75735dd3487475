//! # Supervisor lifecycle state.
//!
//! ```text
//! Created ──run()──► Running ──► AllCompleted ─┐
//!                            └─► Failed ───────┼──shutdown()──► ShuttingDown ──► Shutdown
//!                    (any state) ──────────────┘
//! ```
//!
//! The end of `run` only moves out of `Running`; once `shutdown` has started,
//! the shutdown states win.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a [`Supervisor`](crate::Supervisor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SupervisorState {
    /// Built, runners and closers may be registered.
    Created = 0,
    /// `run` is executing.
    Running = 1,
    /// Every runner returned without error.
    AllCompleted = 2,
    /// At least one runner failed.
    Failed = 3,
    /// `shutdown` is releasing closers.
    ShuttingDown = 4,
    /// `shutdown` attempted every closer.
    Shutdown = 5,
}

impl SupervisorState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => SupervisorState::Created,
            1 => SupervisorState::Running,
            2 => SupervisorState::AllCompleted,
            3 => SupervisorState::Failed,
            4 => SupervisorState::ShuttingDown,
            _ => SupervisorState::Shutdown,
        }
    }
}

/// Atomic cell holding a [`SupervisorState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(SupervisorState::Created as u8))
    }

    pub(crate) fn get(&self) -> SupervisorState {
        SupervisorState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: SupervisorState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Moves `from → to`; returns the observed state on mismatch.
    pub(crate) fn transition(
        &self,
        from: SupervisorState,
        to: SupervisorState,
    ) -> Result<(), SupervisorState> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(SupervisorState::from_u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_only_from_expected_state() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), SupervisorState::Created);
        assert!(cell.transition(SupervisorState::Created, SupervisorState::Running).is_ok());
        assert_eq!(
            cell.transition(SupervisorState::Created, SupervisorState::Running),
            Err(SupervisorState::Running)
        );

        cell.set(SupervisorState::ShuttingDown);
        assert_eq!(
            cell.transition(SupervisorState::Running, SupervisorState::Failed),
            Err(SupervisorState::ShuttingDown)
        );
        assert_eq!(cell.get(), SupervisorState::ShuttingDown);
    }
}

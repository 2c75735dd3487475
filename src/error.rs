//! Error types used by the appvisor runtime, runners and closers.
//!
//! This module defines three enums:
//!
//! - [`RuntimeError`] — errors surfaced by [`Supervisor::run`](crate::Supervisor::run)
//!   and [`Supervisor::run_until_shutdown`](crate::Supervisor::run_until_shutdown).
//! - [`RunnerError`] — errors returned by an individual [`Runner`](crate::Runner).
//! - [`CloseError`] — errors returned by an individual [`Closer`](crate::Closer).
//!
//! All of them provide `as_label` (stable snake_case label for logs) and `as_message`.

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

use crate::core::SupervisorState;

/// # Errors produced by the supervisor runtime.
///
/// A runner failure is wrapped with the runner's name, so the caller of
/// `run` can tell which unit of work brought the process down.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A runner returned an error. Only the first one to arrive is surfaced.
    #[error("start runner[{runner}]: {source}")]
    RunnerFailed {
        /// Name of the failed runner.
        runner: String,
        /// The error returned by the runner.
        #[source]
        source: RunnerError,
    },

    /// A runner panicked. Treated exactly like a failure.
    #[error("start runner[{runner}]: panicked: {info}")]
    RunnerPanicked {
        /// Name of the panicked runner.
        runner: String,
        /// Panic payload rendered as text.
        info: String,
    },

    /// `run` was invoked on a supervisor that is not in [`SupervisorState::Created`].
    #[error("supervisor cannot run from state {state:?}")]
    InvalidState {
        /// State observed when `run` was called.
        state: SupervisorState,
    },

    /// Runners did not stop within the grace period after a termination signal.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of runners still executing when the grace expired.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use appvisor::{RunnerError, RuntimeError};
    ///
    /// let err = RuntimeError::RunnerFailed {
    ///     runner: "http".into(),
    ///     source: RunnerError::fail("bind: address in use"),
    /// };
    /// assert_eq!(err.as_label(), "runtime_runner_failed");
    /// assert_eq!(err.to_string(), "start runner[http]: bind: address in use");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::RunnerFailed { .. } => "runtime_runner_failed",
            RuntimeError::RunnerPanicked { .. } => "runtime_runner_panicked",
            RuntimeError::InvalidState { .. } => "runtime_invalid_state",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::RunnerFailed { runner, source } => {
                format!("runner {runner} failed: {}", source.as_message())
            }
            RuntimeError::RunnerPanicked { runner, info } => {
                format!("runner {runner} panicked: {info}")
            }
            RuntimeError::InvalidState { state } => format!("invalid state: {state:?}"),
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck runners={stuck:?}")
            }
        }
    }

    /// Returns the name of the runner responsible for this error, if any.
    pub fn runner(&self) -> Option<&str> {
        match self {
            RuntimeError::RunnerFailed { runner, .. } | RuntimeError::RunnerPanicked { runner, .. } => {
                Some(runner)
            }
            _ => None,
        }
    }
}

/// # Errors produced by a runner.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The runner failed; this ends `run` and cancels every other runner.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The runner observed cancellation and exited. Not counted as a failure.
    #[error("context cancelled")]
    Canceled,
}

impl RunnerError {
    /// Builds a [`RunnerError::Fail`] from anything printable.
    pub fn fail(error: impl Display) -> Self {
        RunnerError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use appvisor::RunnerError;
    ///
    /// assert_eq!(RunnerError::fail("boom").as_label(), "runner_failed");
    /// assert_eq!(RunnerError::Canceled.as_label(), "runner_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunnerError::Fail { .. } => "runner_failed",
            RunnerError::Canceled => "runner_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RunnerError::Fail { error } => format!("error: {error}"),
            RunnerError::Canceled => "context cancelled".to_string(),
        }
    }

    /// Whether this error is a cooperative exit rather than a failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RunnerError::Canceled)
    }
}

/// # Errors produced by a closer.
///
/// Closer errors never reach a caller: the supervisor logs them and moves on
/// to the next closer.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CloseError {
    /// Releasing the resource failed.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl CloseError {
    /// Builds a [`CloseError::Fail`] from anything printable.
    pub fn fail(error: impl Display) -> Self {
        CloseError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            CloseError::Fail { .. } => "close_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CloseError::Fail { error } => format!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_failed_wraps_with_identity() {
        let err = RuntimeError::RunnerFailed {
            runner: "grpc".into(),
            source: RunnerError::fail("boom"),
        };
        assert_eq!(err.to_string(), "start runner[grpc]: boom");
        assert_eq!(err.runner(), Some("grpc"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_panicked_names_runner() {
        let err = RuntimeError::RunnerPanicked {
            runner: "worker".into(),
            info: "index out of bounds".into(),
        };
        assert_eq!(err.to_string(), "start runner[worker]: panicked: index out of bounds");
        assert_eq!(err.as_label(), "runtime_runner_panicked");
    }

    #[test]
    fn test_grace_exceeded_has_no_runner() {
        let err = RuntimeError::GraceExceeded {
            grace: Duration::from_secs(1),
            stuck: vec!["a".into()],
        };
        assert_eq!(err.runner(), None);
        assert!(err.as_message().contains("stuck runners=[\"a\"]"));
    }

    #[test]
    fn test_canceled_is_not_failure() {
        assert!(RunnerError::Canceled.is_canceled());
        assert!(!RunnerError::fail("x").is_canceled());
    }

    #[test]
    fn test_close_error_message() {
        let err = CloseError::fail("disk full");
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.as_message(), "error: disk full");
        assert_eq!(err.as_label(), "close_failed");
    }
}

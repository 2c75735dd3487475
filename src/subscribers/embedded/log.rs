//! # LogWriter: events as structured log records
//!
//! Renders incoming [`Event`]s through `tracing`. Failures go out at `warn`,
//! everything else at `info` or `debug`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG appvisor: runner starting runner="http"
//!  WARN appvisor: runner failed runner="http" reason="bind: address in use"
//!  INFO appvisor: shutdown started
//!  WARN appvisor: closer failed closer="log-file" reason="disk full"
//!  INFO appvisor: shutdown finished
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let runner = e.runner.as_deref().unwrap_or("");
        let closer = e.closer.as_deref().unwrap_or("");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::RunnerStarting => debug!(target: "appvisor", seq = e.seq, runner, "runner starting"),
            EventKind::RunnerStopped => debug!(target: "appvisor", seq = e.seq, runner, "runner stopped"),
            EventKind::RunnerFailed => {
                warn!(target: "appvisor", seq = e.seq, runner, reason, "runner failed")
            }
            EventKind::RunFinished if e.reason.is_some() => {
                warn!(target: "appvisor", seq = e.seq, reason, "run finished with error")
            }
            EventKind::RunFinished => info!(target: "appvisor", seq = e.seq, "run finished"),
            EventKind::ShutdownRequested => info!(target: "appvisor", seq = e.seq, "shutdown requested"),
            EventKind::AllStoppedWithin => {
                info!(target: "appvisor", seq = e.seq, "all runners stopped within grace")
            }
            EventKind::GraceExceeded => {
                warn!(target: "appvisor", seq = e.seq, grace_ms = e.timeout_ms, "grace exceeded")
            }
            EventKind::ShutdownStarted => info!(target: "appvisor", seq = e.seq, "shutdown started"),
            EventKind::CloserClosed => debug!(target: "appvisor", seq = e.seq, closer, "closer closed"),
            EventKind::CloserFailed => {
                warn!(target: "appvisor", seq = e.seq, closer, reason, "closer failed")
            }
            EventKind::ShutdownFinished => info!(target: "appvisor", seq = e.seq, "shutdown finished"),
            EventKind::SubscriberOverflow => warn!(
                target: "appvisor",
                subscriber = e.subscriber.as_deref().unwrap_or("unknown"),
                reason,
                "subscriber overflow"
            ),
            EventKind::SubscriberPanicked => warn!(
                target: "appvisor",
                subscriber = e.subscriber.as_deref().unwrap_or("unknown"),
                reason,
                "subscriber panicked"
            ),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

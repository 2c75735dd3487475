//! # Runner capability.
//!
//! A [`Runner`] is a unit of long-running work started by the
//! [`Supervisor`](crate::Supervisor). It receives the shared [`CancellationToken`]
//! and must return promptly once the token is cancelled.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RunnerError;

/// Shared handle to a runner.
pub type RunnerRef = Arc<dyn Runner>;

/// # Long-running, cancelable unit of work.
///
/// A runner has a diagnostic [`name`](Runner::name) and an async [`run`](Runner::run)
/// method. Returning `Err(RunnerError::Fail)` ends the whole supervisor run and
/// cancels every other runner; returning `Err(RunnerError::Canceled)` reports a
/// cooperative exit and is not treated as a failure.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use appvisor::{Runner, RunnerError};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Runner for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), RunnerError> {
///         ctx.cancelled().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Runner: Send + Sync + 'static {
    /// Returns the name used to annotate errors, events and logs.
    ///
    /// Not used for lookup or deduplication. The default is the concrete type
    /// name, which is verbose; override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Executes until the work is done, fails, or `ctx` is cancelled.
    async fn run(&self, ctx: CancellationToken) -> Result<(), RunnerError>;
}

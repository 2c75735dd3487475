//! # Closure-backed runner (`RunnerFn`)
//!
//! [`RunnerFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a fresh
//! future per `run` call. Shared state, if any, goes into an explicit `Arc<...>`
//! captured by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use appvisor::{RunnerFn, RunnerRef, RunnerError};
//!
//! let r: RunnerRef = RunnerFn::arc("listener", |ctx: CancellationToken| async move {
//!     ctx.cancelled().await;
//!     Ok::<_, RunnerError>(())
//! });
//!
//! assert_eq!(r.name(), "listener");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RunnerError;
use crate::runners::runner::Runner;

/// Closure-backed runner implementation.
#[derive(Debug)]
pub struct RunnerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> RunnerFn<F> {
    /// Creates a new closure-backed runner.
    ///
    /// Prefer [`RunnerFn::arc`] when you immediately need a [`RunnerRef`](crate::RunnerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the runner and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Runner for RunnerFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RunnerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), RunnerError> {
        (self.f)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runners::RunnerRef;

    #[tokio::test]
    async fn test_runner_fn_passes_token() {
        let r: RunnerRef = RunnerFn::arc("waiter", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err::<(), _>(RunnerError::Canceled)
        });
        let token = CancellationToken::new();
        token.cancel();

        let res = r.run(token).await;
        assert!(matches!(res, Err(RunnerError::Canceled)));
        assert_eq!(r.name(), "waiter");
    }

    #[tokio::test]
    async fn test_runner_fn_fresh_future_per_run() {
        let r = RunnerFn::new("once", |_ctx: CancellationToken| async {
            Ok::<(), RunnerError>(())
        });
        assert!(r.run(CancellationToken::new()).await.is_ok());
        assert!(r.run(CancellationToken::new()).await.is_ok());
    }
}

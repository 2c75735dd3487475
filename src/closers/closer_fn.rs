//! # Closure-backed closer (`CloserFn`)
//!
//! ## Example
//! ```rust
//! use appvisor::{CloseError, CloserFn, CloserRef};
//!
//! let c: CloserRef = CloserFn::arc("cache", || async { Ok::<_, CloseError>(()) });
//! assert_eq!(c.name(), "cache");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::closers::closer::Closer;
use crate::error::CloseError;

/// Closure-backed closer implementation.
#[derive(Debug)]
pub struct CloserFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> CloserFn<F> {
    /// Creates a new closure-backed closer.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the closer and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Closer for CloserFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CloseError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn close(&self) -> Result<(), CloseError> {
        (self.f)().await
    }
}

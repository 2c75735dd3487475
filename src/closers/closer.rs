//! # Closer capability.
//!
//! A [`Closer`] is a resource released by [`Supervisor::shutdown`](crate::Supervisor::shutdown).
//! Closers are released one at a time, in registration order.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CloseError;

/// Shared handle to a closer.
pub type CloserRef = Arc<dyn Closer>;

/// # Releasable resource.
///
/// `close` is called exactly once per shutdown. An error is logged with the
/// closer's [`name`](Closer::name); it never stops the remaining closers.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use appvisor::{CloseError, Closer};
///
/// struct Pool;
///
/// #[async_trait]
/// impl Closer for Pool {
///     fn name(&self) -> &str { "db-pool" }
///
///     async fn close(&self) -> Result<(), CloseError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Closer: Send + Sync + 'static {
    /// Returns the name used in shutdown logs and events.
    ///
    /// The default is the concrete type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Releases the resource.
    async fn close(&self) -> Result<(), CloseError>;
}

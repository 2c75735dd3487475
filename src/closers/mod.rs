//! # Closer abstractions.
//!
//! - [`Closer`] - trait for a releasable resource
//! - [`CloserFn`] - closure-backed closer implementation
//! - [`CloserRef`] - shared reference to a closer (`Arc<dyn Closer>`)

mod closer;
mod closer_fn;

pub use closer::{Closer, CloserRef};
pub use closer_fn::CloserFn;

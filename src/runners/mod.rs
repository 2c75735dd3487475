//! # Runner abstractions.
//!
//! This module provides the runner-related types:
//! - [`Runner`] - trait for implementing long-running, cancelable work
//! - [`RunnerFn`] - closure-backed runner implementation
//! - [`RunnerRef`] - shared reference to a runner (`Arc<dyn Runner>`)

mod runner;
mod runner_fn;

pub use runner::{Runner, RunnerRef};
pub use runner_fn::RunnerFn;

//! Runtime core: orchestration and lifecycle.
//!
//! The public API from this module is [`Supervisor`] with its [`SupervisorBuilder`],
//! [`Config`] and [`SupervisorState`].
//!
//! Internal modules:
//! - [`group`]: concurrent runner execution with a first-error latch;
//! - [`supervisor`]: registration, run, ordered shutdown, signal-driven serving;
//! - [`alive`]: names of runners currently executing;
//! - [`state`]: lifecycle state machine;
//! - [`shutdown`]: cross-platform termination signal handling.

mod alive;
mod builder;
mod config;
mod group;
mod shutdown;
mod state;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::Config;
pub use shutdown::{ShutdownSignal, wait_for_shutdown_signal};
pub use state::SupervisorState;
pub use supervisor::Supervisor;

//! # appvisor
//!
//! **appvisor** is a process-lifecycle supervisor for long-running tokio services.
//!
//! It starts a fixed set of independent units of work (**runners**) concurrently,
//! detects the first failure among them, cancels all the others through one shared
//! [`CancellationToken`](tokio_util::sync::CancellationToken), and on shutdown
//! releases registered resources (**closers**) one by one in registration order,
//! logging individual release failures without stopping.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Runner    │   │    Runner    │   │    Runner    │
//!     │  (http api)  │   │  (consumer)  │   │  (scheduler) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - CancellationToken (shared execution context)                   │
//! │  - RunGroup (one tokio task per runner, first-error latch)        │
//! │  - closers: Vec<CloserRef> (released in order on shutdown)        │
//! │  - Bus ──► SubscriberSet ──► LogWriter / custom subscribers       │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Created ──run()──► Running ──► AllCompleted | Failed
//!                                      │
//!                                 shutdown()
//!                                      ▼
//!                      ShuttingDown ──► Shutdown
//!
//! run():       first runner error ─► token.cancel() ─► wait for all ─► Err(first)
//! shutdown():  token.cancel() ─► closer[0].close() ─► closer[1].close() ─► ...
//!              (a failing closer is logged, the next one still runs)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Supervision**   | Concurrent runners, first-failure cancellation, teardown.     | [`Supervisor`], [`SupervisorState`]        |
//! | **Runners**       | Long-running cancelable work.                                 | [`Runner`], [`RunnerFn`], [`RunnerRef`]    |
//! | **Closers**       | Resources released in registration order.                     | [`Closer`], [`CloserFn`], [`CloserRef`]    |
//! | **Events**        | Runtime lifecycle events and subscribers.                     | [`Event`], [`Subscribe`], [`LogWriter`]    |
//! | **Errors**        | Typed errors for the runtime, runners and closers.            | [`RuntimeError`], [`RunnerError`], [`CloseError`] |
//! | **Configuration** | Grace period for signal-driven shutdown, bus capacity.        | [`Config`]                                 |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use appvisor::{
//!     CloseError, CloserFn, CloserRef, Config, LogWriter, RunnerError, RunnerFn, RunnerRef,
//!     Subscribe, Supervisor,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let mut sup = Supervisor::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let worker: RunnerRef = RunnerFn::arc("worker", |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(RunnerError::Canceled);
//!         }
//!         // do work...
//!         Ok(())
//!     });
//!     let cache: CloserRef = CloserFn::arc("cache", || async { Ok::<(), CloseError>(()) });
//!
//!     sup.add_runners([worker]);
//!     sup.add_closers([cache]);
//!
//!     let res = sup.run().await;
//!     sup.shutdown().await;
//!     res?;
//!     Ok(())
//! }
//! ```
mod closers;
mod core;
mod error;
mod events;
mod runners;
mod subscribers;

// ---- Public re-exports ----

pub use closers::{Closer, CloserFn, CloserRef};
pub use self::core::{
    Config, ShutdownSignal, Supervisor, SupervisorBuilder, SupervisorState,
    wait_for_shutdown_signal,
};
pub use error::{CloseError, RunnerError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use runners::{Runner, RunnerFn, RunnerRef};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};

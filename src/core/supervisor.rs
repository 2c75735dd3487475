//! # Supervisor: concurrent runners, first-failure cancellation, ordered teardown.
//!
//! The [`Supervisor`] owns one [`CancellationToken`] shared by every runner, the
//! registered runners and closers, and the event bus.
//!
//! ## Key responsibilities
//! - start every runner concurrently and return the first failure ([`Supervisor::run`])
//! - cancel the shared context and release closers in registration order ([`Supervisor::shutdown`])
//! - tie both to OS termination signals with an optional grace period
//!   ([`Supervisor::run_until_shutdown`])
//!
//! ## High-level architecture
//! ```text
//! Composition (&mut self):
//!   add_runners(..)  add_closers(..)
//!
//! run():
//!   Created ─► Running
//!   runners[0..N] ──► RunGroup::spawn(runner)        (one tokio task each)
//!                       └─► runner.run(token.clone())
//!   RunGroup::wait():
//!     first failure ─► token.cancel() ─► every runner observes ctx.cancelled()
//!     all joined    ─► AllCompleted | Failed, return first error
//!
//! shutdown():
//!   ─► ShuttingDown
//!   ─► token.cancel()                 (no-op if already cancelled)
//!   ─► closers[0].close().await       error → tracing::error!, CloserFailed, continue
//!   ─► closers[1].close().await
//!   ─► ...
//!   ─► Shutdown, ShutdownFinished
//!   ─► stop the event listener, flush subscriber queues (first call only)
//!
//! run_until_shutdown():
//!   select! {
//!     run() finished      ─► shutdown()
//!     termination signal  ─► ShutdownRequested, token.cancel()
//!                            drain run() (bounded by Config::grace if set)
//!                            grace expired ─► abort stuck runner tasks, wait for them
//!                            shutdown()
//!   }
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use appvisor::{CloseError, CloserFn, CloserRef, Config, RunnerError, RunnerFn, RunnerRef, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sup = Supervisor::new(Config::default());
//!
//!     let ticker: RunnerRef = RunnerFn::arc("ticker", |ctx: CancellationToken| async move {
//!         for _ in 0..3 {
//!             if ctx.is_cancelled() {
//!                 break;
//!             }
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!         }
//!         Ok::<(), RunnerError>(())
//!     });
//!     let pool: CloserRef = CloserFn::arc("pool", || async { Ok::<(), CloseError>(()) });
//!
//!     sup.add_runners([ticker]);
//!     sup.add_closers([pool]);
//!
//!     let res = sup.run().await;
//!     sup.shutdown().await;
//!     res?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    closers::CloserRef,
    core::{
        alive::AliveTracker,
        builder::SupervisorBuilder,
        config::Config,
        group::RunGroup,
        shutdown,
        state::{StateCell, SupervisorState},
    },
    error::{CloseError, RuntimeError},
    events::{Bus, Event, EventKind},
    runners::RunnerRef,
    subscribers::{SubscriberSet, panic_info},
};

/// Coordinates runner execution and closer teardown for one process.
pub struct Supervisor {
    cfg: Config,
    token: CancellationToken,
    runners: Vec<RunnerRef>,
    closers: Vec<CloserRef>,
    bus: Bus,
    abort: CancellationToken,
    fanout_stop: CancellationToken,
    fanout: Mutex<Option<JoinHandle<SubscriberSet>>>,
    alive: Arc<AliveTracker>,
    state: StateCell,
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        // Lets the listener exit so subscriber workers release their subscribers.
        self.fanout_stop.cancel();
    }
}

impl Supervisor {
    /// Creates a supervisor without subscribers.
    pub fn new(cfg: Config) -> Self {
        SupervisorBuilder::new(cfg).build()
    }

    /// Returns a builder for a supervisor with subscribers or pre-registered units.
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        fanout_stop: CancellationToken,
        fanout: Option<JoinHandle<SubscriberSet>>,
        runners: Vec<RunnerRef>,
        closers: Vec<CloserRef>,
    ) -> Self {
        Self {
            cfg,
            token: CancellationToken::new(),
            runners,
            closers,
            bus,
            abort: CancellationToken::new(),
            fanout_stop,
            fanout: Mutex::new(fanout),
            alive: Arc::new(AliveTracker::new()),
            state: StateCell::new(),
        }
    }

    /// Appends runners. Duplicates are allowed and run independently.
    pub fn add_runners(&mut self, runners: impl IntoIterator<Item = RunnerRef>) {
        self.runners.extend(runners);
    }

    /// Appends closers. Closers are released in the order they were added.
    pub fn add_closers(&mut self, closers: impl IntoIterator<Item = CloserRef>) {
        self.closers.extend(closers);
    }

    /// Returns the execution context shared by every runner.
    pub fn context(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns the runtime configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SupervisorState {
        self.state.get()
    }

    /// Returns the event bus; subscribe to it to observe the runtime directly.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Returns sorted names of runners currently executing.
    pub fn alive(&self) -> Vec<String> {
        self.alive.snapshot()
    }

    /// Starts every registered runner concurrently and waits until all of them return.
    ///
    /// The first runner error (by arrival) cancels the shared context and is returned
    /// once every other runner has exited. A supervisor runs once: any further call
    /// returns [`RuntimeError::InvalidState`].
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.state
            .transition(SupervisorState::Created, SupervisorState::Running)
            .map_err(|state| RuntimeError::InvalidState { state })?;
        debug!(runners = self.runners.len(), "starting runners");

        let mut group = RunGroup::new(
            self.token.clone(),
            self.abort.clone(),
            Arc::clone(&self.alive),
            self.bus.clone(),
        );
        for runner in &self.runners {
            group.spawn(Arc::clone(runner));
        }
        let res = group.wait().await;

        let end = match &res {
            Ok(()) => SupervisorState::AllCompleted,
            Err(_) => SupervisorState::Failed,
        };
        let _ = self.state.transition(SupervisorState::Running, end);
        res
    }

    /// Cancels the shared context, then releases every closer in registration order.
    ///
    /// Closer errors (and panics) are logged with the closer's name and never stop
    /// the sequence. Does not wait for [`run`](Self::run) to return.
    ///
    /// The first call also stops event delivery: everything published up to
    /// `ShutdownFinished` reaches the subscribers before this returns.
    pub async fn shutdown(&self) {
        self.state.set(SupervisorState::ShuttingDown);
        self.token.cancel();
        self.bus.publish(Event::new(EventKind::ShutdownStarted));

        for closer in &self.closers {
            let res = std::panic::AssertUnwindSafe(closer.close())
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(CloseError::fail(format!("panicked: {}", panic_info(&*panic)))));

            match res {
                Ok(()) => {
                    debug!(closer = closer.name(), "closer closed");
                    self.bus
                        .publish(Event::new(EventKind::CloserClosed).with_closer(closer.name()));
                }
                Err(err) => {
                    error!(closer = closer.name(), error = %err, "close failed");
                    self.bus.publish(
                        Event::new(EventKind::CloserFailed)
                            .with_closer(closer.name())
                            .with_reason(err.to_string()),
                    );
                }
            }
        }

        self.state.set(SupervisorState::Shutdown);
        self.bus.publish(Event::new(EventKind::ShutdownFinished));
        self.flush_subscribers().await;
    }

    async fn flush_subscribers(&self) {
        let listener = self.fanout.lock().unwrap_or_else(PoisonError::into_inner).take();
        let Some(listener) = listener else {
            return;
        };

        self.fanout_stop.cancel();
        match listener.await {
            Ok(set) => set.shutdown().await,
            Err(err) => warn!(error = %err, "event listener task failed"),
        }
    }

    /// Runs until every runner returns or a termination signal arrives, then shuts down.
    ///
    /// On a signal the context is cancelled and runners are drained; with a non-zero
    /// [`Config::grace`] runners still executing after the grace are aborted and
    /// [`RuntimeError::GraceExceeded`] is returned. Aborted runners are gone before
    /// the first closer runs. Closers are released in every case.
    pub async fn run_until_shutdown(&self) -> Result<(), RuntimeError> {
        let run = self.run();
        tokio::pin!(run);

        let signal = async {
            match shutdown::wait_for_shutdown_signal().await {
                Ok(sig) => sig,
                Err(err) => {
                    warn!(error = %err, "cannot listen for termination signals");
                    std::future::pending().await
                }
            }
        };

        let res = tokio::select! {
            res = &mut run => res,
            sig = signal => {
                info!(signal = ?sig, "termination signal received");
                self.bus.publish(
                    Event::new(EventKind::ShutdownRequested).with_reason(format!("{sig:?}")),
                );
                self.token.cancel();
                self.drain_within_grace(run).await
            }
        };

        self.shutdown().await;
        res
    }

    /// Awaits a cancelled `run` future, bounded by the configured grace period.
    ///
    /// On expiry the stuck runner tasks are aborted and `run` is awaited once more,
    /// so no runner is alive when this returns.
    async fn drain_within_grace<F>(&self, mut run: Pin<&mut F>) -> Result<(), RuntimeError>
    where
        F: Future<Output = Result<(), RuntimeError>>,
    {
        let Some(grace) = self.cfg.grace_limit() else {
            return run.await;
        };

        match tokio::time::timeout(grace, run.as_mut()).await {
            Ok(res) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                res
            }
            Err(_elapsed) => {
                let stuck = self.alive.snapshot();
                warn!(?grace, ?stuck, "grace exceeded, aborting runners");
                self.bus
                    .publish(Event::new(EventKind::GraceExceeded).with_timeout(grace));

                self.abort.cancel();
                if let Err(err) = run.await {
                    debug!(error = %err, "run error after grace expiry");
                }
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}

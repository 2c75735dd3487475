//! # Run group: concurrent runners with a first-error latch.
//!
//! [`RunGroup`] spawns each runner on its own tokio task sharing one
//! [`CancellationToken`], then drains them.
//!
//! ```text
//! spawn(runner) ──► tokio task ──► runner.run(token.clone())
//!                                     ├─ Ok / Canceled ─► publish RunnerStopped
//!                                     └─ Fail / panic  ─► token.cancel()
//!                                                         publish RunnerFailed
//!
//! wait():
//!   join_next() in completion order
//!     ├─ first Err ─► latched, returned after drain
//!     └─ later Err ─► logged at debug, dropped
//!   abort fired  ─► abort_all(), aborted tasks drained and dropped
//!   all joined   ─► token.cancel(), publish RunFinished
//! ```
//!
//! ## Rules
//! - The failing task cancels the token **before** it completes, so every other
//!   runner can observe cancellation no later than the failure is latched.
//! - `wait` never returns while a runner task is still executing. After the
//!   abort token fires it still waits for aborted tasks, so their alive guards
//!   are gone by the time it returns.
//! - Panics are caught in the task and surface as [`RuntimeError::RunnerPanicked`].

use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    core::alive::AliveTracker,
    error::{RunnerError, RuntimeError},
    events::{Bus, Event, EventKind},
    runners::RunnerRef,
    subscribers::panic_info,
};

/// Single-use group of concurrently executing runners.
pub(crate) struct RunGroup {
    set: JoinSet<Result<(), RuntimeError>>,
    token: CancellationToken,
    abort: CancellationToken,
    alive: Arc<AliveTracker>,
    bus: Bus,
}

impl RunGroup {
    /// `abort` forces termination of tasks still running when it fires.
    pub(crate) fn new(
        token: CancellationToken,
        abort: CancellationToken,
        alive: Arc<AliveTracker>,
        bus: Bus,
    ) -> Self {
        Self {
            set: JoinSet::new(),
            token,
            abort,
            alive,
            bus,
        }
    }

    /// Spawns `runner` with a clone of the group token.
    pub(crate) fn spawn(&mut self, runner: RunnerRef) {
        let token = self.token.clone();
        let bus = self.bus.clone();
        let guard = self.alive.enter(runner.name());

        bus.publish(Event::new(EventKind::RunnerStarting).with_runner(runner.name()));
        self.set.spawn(async move {
            let _guard = guard;
            let res = std::panic::AssertUnwindSafe(runner.run(token.clone()))
                .catch_unwind()
                .await;

            let err = match res {
                Ok(Ok(())) | Ok(Err(RunnerError::Canceled)) => {
                    bus.publish(Event::new(EventKind::RunnerStopped).with_runner(runner.name()));
                    return Ok(());
                }
                Ok(Err(source)) => RuntimeError::RunnerFailed {
                    runner: runner.name().to_string(),
                    source,
                },
                Err(panic) => RuntimeError::RunnerPanicked {
                    runner: runner.name().to_string(),
                    info: panic_info(&*panic),
                },
            };

            token.cancel();
            bus.publish(
                Event::new(EventKind::RunnerFailed)
                    .with_runner(runner.name())
                    .with_reason(err.to_string()),
            );
            Err(err)
        });
    }

    /// Waits for every runner and returns the first error to arrive.
    pub(crate) async fn wait(mut self) -> Result<(), RuntimeError> {
        let mut first: Option<RuntimeError> = None;

        let mut aborted = false;

        loop {
            let joined = tokio::select! {
                joined = self.set.join_next() => joined,
                _ = self.abort.cancelled(), if !aborted => {
                    aborted = true;
                    self.token.cancel();
                    self.set.abort_all();
                    continue;
                }
            };
            let Some(joined) = joined else { break };

            let res = match joined {
                Ok(res) => res,
                Err(je) if je.is_cancelled() => {
                    debug!("runner task aborted");
                    continue;
                }
                Err(je) => Err(RuntimeError::RunnerPanicked {
                    runner: "unknown".to_string(),
                    info: je.to_string(),
                }),
            };
            if let Err(err) = res {
                self.token.cancel();
                match first {
                    None => first = Some(err),
                    Some(_) => debug!(error = %err, "runner error after first failure"),
                }
            }
        }
        self.token.cancel();

        let mut ev = Event::new(EventKind::RunFinished);
        if let Some(err) = &first {
            ev = ev.with_reason(err.to_string());
        }
        self.bus.publish(ev);

        first.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runners::RunnerFn;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn group() -> (RunGroup, CancellationToken) {
        let token = CancellationToken::new();
        let group = RunGroup::new(
            token.clone(),
            CancellationToken::new(),
            Arc::new(AliveTracker::new()),
            Bus::new(64),
        );
        (group, token)
    }

    fn failing_after(name: &'static str, ms: u64) -> RunnerRef {
        RunnerFn::arc(name, move |_ctx: CancellationToken| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Err::<(), _>(RunnerError::fail(format!("{name} broke")))
        })
    }

    #[tokio::test]
    async fn test_empty_group_returns_ok() {
        let (group, token) = group();
        assert!(group.wait().await.is_ok());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_waits_for_all_successes() {
        let (mut group, _token) = group();
        let done = Arc::new(AtomicUsize::new(0));
        for i in 0..5u64 {
            let done = done.clone();
            group.spawn(RunnerFn::arc(format!("r{i}"), move |_ctx: CancellationToken| {
                let done = done.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(5 * i)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), RunnerError>(())
                }
            }));
        }

        assert!(group.wait().await.is_ok());
        assert_eq!(done.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_first_error_by_arrival_not_registration() {
        let (mut group, _token) = group();
        group.spawn(failing_after("slow", 80));
        group.spawn(failing_after("fast", 10));

        let err = group.wait().await.unwrap_err();
        assert_eq!(err.runner(), Some("fast"));
        assert!(err.to_string().contains("fast broke"));
    }

    #[tokio::test]
    async fn test_failure_cancels_siblings() {
        let (mut group, token) = group();
        let observed = Arc::new(AtomicBool::new(false));
        let flag = observed.clone();

        group.spawn(RunnerFn::arc("waiter", move |ctx: CancellationToken| {
            let flag = flag.clone();
            async move {
                ctx.cancelled().await;
                flag.store(true, Ordering::SeqCst);
                Ok::<(), RunnerError>(())
            }
        }));
        group.spawn(failing_after("boom", 10));

        let err = group.wait().await.unwrap_err();
        assert_eq!(err.runner(), Some("boom"));
        assert!(observed.load(Ordering::SeqCst));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_canceled_is_graceful() {
        let (mut group, token) = group();
        token.cancel();
        group.spawn(RunnerFn::arc("polite", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err::<(), _>(RunnerError::Canceled)
        }));
        assert!(group.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_panic_becomes_failure() {
        let (mut group, token) = group();
        group.spawn(RunnerFn::arc("crashy", |_ctx: CancellationToken| async move {
            if true {
                panic!("kaboom");
            }
            Ok::<(), RunnerError>(())
        }));

        let err = group.wait().await.unwrap_err();
        assert!(matches!(err, RuntimeError::RunnerPanicked { .. }));
        assert_eq!(err.runner(), Some("crashy"));
        assert!(err.to_string().contains("kaboom"));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_publishes_lifecycle_events() {
        let token = CancellationToken::new();
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let mut group = RunGroup::new(token, CancellationToken::new(), Arc::new(AliveTracker::new()), bus);
        group.spawn(failing_after("bad", 1));
        let _ = group.wait().await;

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![EventKind::RunnerStarting, EventKind::RunnerFailed, EventKind::RunFinished]
        );
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_abort_drops_stuck_runner_before_returning() {
        let token = CancellationToken::new();
        let abort = CancellationToken::new();
        let alive = Arc::new(AliveTracker::new());
        let mut group = RunGroup::new(token.clone(), abort.clone(), alive.clone(), Bus::new(64));

        let dropped = Arc::new(AtomicBool::new(false));
        let flag = dropped.clone();
        group.spawn(RunnerFn::arc("stubborn", move |_ctx: CancellationToken| {
            let flag = flag.clone();
            async move {
                let _held = SetOnDrop(flag);
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<(), RunnerError>(())
            }
        }));

        let trigger = abort.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let res = tokio::time::timeout(Duration::from_secs(5), group.wait())
            .await
            .expect("wait must return after abort");
        assert!(res.is_ok());
        assert!(dropped.load(Ordering::SeqCst));
        assert!(alive.snapshot().is_empty());
        assert!(token.is_cancelled());
    }
}

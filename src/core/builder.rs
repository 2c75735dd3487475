//! # Supervisor builder and the event listener.
//!
//! [`SupervisorBuilder`] collects configuration, subscribers and units, then
//! wires the bus to the subscriber workers.
//!
//! ```text
//! Bus ──► listener task ──► SubscriberSet::emit ──► worker per subscriber
//!            │
//!            └─ stop token fired ─► drain pending bus events ─► return the set
//! ```
//!
//! The listener owns the [`SubscriberSet`] and hands it back when stopped, so
//! [`Supervisor::shutdown`] can flush the worker queues and dropping the
//! supervisor releases every subscriber.

use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{
    closers::CloserRef,
    core::Config,
    events::Bus,
    runners::RunnerRef,
    subscribers::{Subscribe, SubscriberSet},
};
use super::supervisor::Supervisor;

/// Builder for constructing a [`Supervisor`] with subscribers and pre-registered units.
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    runners: Vec<RunnerRef>,
    closers: Vec<CloserRef>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            runners: Vec::new(),
            closers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded
    /// queues. With at least one subscriber, [`build`](Self::build) must run inside
    /// a tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Registers runners, same as [`Supervisor::add_runners`].
    pub fn with_runners(mut self, runners: impl IntoIterator<Item = RunnerRef>) -> Self {
        self.runners.extend(runners);
        self
    }

    /// Registers closers, same as [`Supervisor::add_closers`].
    pub fn with_closers(mut self, closers: impl IntoIterator<Item = CloserRef>) -> Self {
        self.closers.extend(closers);
        self
    }

    /// Builds the supervisor.
    ///
    /// Creates the event bus and, when subscribers are present, spawns the
    /// listener that fans bus events out to them.
    pub fn build(self) -> Supervisor {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let stop = CancellationToken::new();
        let set = SubscriberSet::new(self.subscribers, bus.clone());

        let listener = if set.is_empty() {
            None
        } else {
            Some(subscriber_listener(&bus, set, stop.clone()))
        };
        Supervisor::new_internal(self.cfg, bus, stop, listener, self.runners, self.closers)
    }
}

/// Forwards bus events to `set` until `stop` fires, then drains what is
/// already queued on the bus and returns the set.
fn subscriber_listener(
    bus: &Bus,
    set: SubscriberSet,
    stop: CancellationToken,
) -> JoinHandle<SubscriberSet> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event listener lagged behind the bus");
                    }
                    Err(RecvError::Closed) => return set,
                },
            }
        }

        loop {
            match rx.try_recv() {
                Ok(ev) => set.emit(&ev),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "event listener lagged behind the bus");
                }
                Err(_) => break,
            }
        }
        set
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventKind};
    use crate::runners::RunnerFn;
    use crate::error::RunnerError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[derive(Default)]
    struct Collector {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Collector {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "collector"
        }
    }

    #[test]
    fn test_build_without_subscribers_outside_runtime() {
        let sup = SupervisorBuilder::new(Config::default()).build();
        assert!(sup.alive().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_receive_run_events() {
        let collector = Arc::new(Collector::default());
        let runner: RunnerRef = RunnerFn::arc("one", |_ctx: CancellationToken| async {
            Ok::<(), RunnerError>(())
        });
        let subs: Vec<Arc<dyn Subscribe>> = vec![collector.clone()];
        let sup = Supervisor::builder(Config::default())
            .with_subscribers(subs)
            .with_runners([runner])
            .build();

        sup.run().await.unwrap();

        let expected = vec![
            EventKind::RunnerStarting,
            EventKind::RunnerStopped,
            EventKind::RunFinished,
        ];
        for _ in 0..100 {
            if *collector.kinds.lock().unwrap() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("events not delivered: {:?}", collector.kinds.lock().unwrap());
    }

    #[tokio::test]
    async fn test_shutdown_flushes_events_to_subscribers() {
        let collector = Arc::new(Collector::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![collector.clone()];
        let sup = Supervisor::builder(Config::default())
            .with_subscribers(subs)
            .build();

        sup.run().await.unwrap();
        sup.shutdown().await;

        assert_eq!(
            *collector.kinds.lock().unwrap(),
            vec![
                EventKind::RunFinished,
                EventKind::ShutdownStarted,
                EventKind::ShutdownFinished,
            ]
        );
        // Workers exited during the flush.
        assert_eq!(Arc::strong_count(&collector), 1);

        drop(sup);
        assert_eq!(Arc::strong_count(&collector), 1);
    }

    #[tokio::test]
    async fn test_drop_without_shutdown_releases_subscribers() {
        let collector = Arc::new(Collector::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![collector.clone()];
        let sup = Supervisor::builder(Config::default())
            .with_subscribers(subs)
            .build();
        sup.run().await.unwrap();

        drop(sup);
        for _ in 0..100 {
            if Arc::strong_count(&collector) == 1 {
                assert_eq!(*collector.kinds.lock().unwrap(), vec![EventKind::RunFinished]);
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("subscriber still referenced after drop");
    }
}

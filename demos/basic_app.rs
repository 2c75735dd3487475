//! # Example: basic_app
//!
//! A service with two runners and three closers, stopped by Ctrl-C / SIGTERM.
//!
//! Demonstrates how to:
//! - Log through a non-blocking `tracing-appender` writer and register the
//!   release of its `WorkerGuard` (which flushes buffered lines) as the last closer.
//! - Register runners that honor the shared [`CancellationToken`].
//! - Serve with [`Supervisor::run_until_shutdown`] and a grace period.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Supervisor::builder(cfg).build()
//!   ├─► add_runners([ticker, heartbeat])
//!   ├─► add_closers([cache, db-pool, log-flush])
//!   └─► run_until_shutdown()
//!         ├─► runners tick until the signal
//!         ├─► SIGTERM ─► token.cancel() ─► runners exit within grace
//!         └─► shutdown(): cache ─► db-pool ─► log-flush
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic_app
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use appvisor::{CloseError, CloserFn, CloserRef, Config, RunnerError, RunnerFn, RunnerRef, Supervisor};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn ticker(name: &'static str, every: Duration) -> RunnerRef {
    RunnerFn::arc(name, move |ctx: CancellationToken| async move {
        let mut n = 0u64;
        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    tracing::info!(runner = name, ticks = n, "stopping");
                    return Err::<(), _>(RunnerError::Canceled);
                }
                _ = tokio::time::sleep(every) => {
                    n += 1;
                    tracing::info!(runner = name, tick = n);
                }
            }
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging through a background writer thread
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();
    let guard = Arc::new(Mutex::new(Some(guard)));

    // 2. Supervisor with a 5s drain limit
    let cfg = Config {
        grace: Duration::from_secs(5),
        ..Config::default()
    };
    let mut sup = Supervisor::builder(cfg).build();

    // 3. Runners
    sup.add_runners([
        ticker("ticker", Duration::from_millis(500)),
        ticker("heartbeat", Duration::from_secs(2)),
    ]);

    // 4. Closers, released in this order
    let cache: CloserRef = CloserFn::arc("cache", || async {
        tracing::info!("cache flushed");
        Ok::<(), CloseError>(())
    });
    let pool: CloserRef = CloserFn::arc("db-pool", || async {
        Err::<(), _>(CloseError::fail("connection reset while closing"))
    });
    let log_flush: CloserRef = CloserFn::arc("log-flush", move || {
        // Dropping the guard blocks until the writer thread has written every queued line.
        let flushed = guard.lock().map(|mut g| g.take().is_some()).unwrap_or(false);
        async move {
            if flushed {
                Ok(())
            } else {
                Err(CloseError::fail("log writer already released"))
            }
        }
    });
    sup.add_closers([cache, pool, log_flush]);

    // 5. Serve until a termination signal
    sup.run_until_shutdown().await?;
    Ok(())
}

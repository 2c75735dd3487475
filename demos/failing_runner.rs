//! # Example: failing_runner
//!
//! One runner fails and the other observes cancellation. Closers still run, and
//! a [`LogWriter`] subscriber reports every lifecycle event, including the ones
//! published during shutdown.
//!
//! ## Flow
//! ```text
//! run()
//!   ├─► "listener" waits on ctx.cancelled()
//!   ├─► "migrator" fails after 300ms ─► token.cancel()
//!   ├─► "listener" exits
//!   └─► Err("start runner[migrator]: schema version mismatch")
//! shutdown()
//!   └─► "db-pool" closed
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example failing_runner
//! ```

use std::sync::Arc;
use std::time::Duration;

use appvisor::{
    CloseError, CloserFn, CloserRef, Config, LogWriter, RunnerError, RunnerFn, RunnerRef,
    Subscribe, Supervisor,
};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mut sup = Supervisor::builder(Config::default()).with_subscribers(subs).build();

    let listener: RunnerRef = RunnerFn::arc("listener", |ctx: CancellationToken| async move {
        println!("[listener] accepting connections");
        ctx.cancelled().await;
        println!("[listener] cancelled, exiting");
        Ok::<(), RunnerError>(())
    });
    let migrator: RunnerRef = RunnerFn::arc("migrator", |_ctx: CancellationToken| async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Err::<(), _>(RunnerError::fail("schema version mismatch"))
    });
    let pool: CloserRef = CloserFn::arc("db-pool", || async {
        println!("[db-pool] closed");
        Ok::<(), CloseError>(())
    });

    sup.add_runners([listener, migrator]);
    sup.add_closers([pool]);

    let res = sup.run().await;
    sup.shutdown().await;

    if let Err(err) = &res {
        println!("run failed: {err} ({})", err.as_label());
    }
    Ok(())
}

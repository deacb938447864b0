//! Scholarship tracker: long-running entrypoint.
//! Runs a pass at startup, then once per configured interval, until killed.

use anyhow::Result;
use scholarship_tracker::{bootstrap, init_tracing, IntervalTrigger, Scheduler};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let (cfg, pipeline) = bootstrap()?;
    let period = cfg.settings.interval();
    tracing::info!(
        interval_secs = period.as_secs(),
        log = %cfg.settings.log_path.display(),
        "scheduler starting"
    );

    let mut scheduler = Scheduler::new(pipeline, IntervalTrigger::new(period));
    scheduler.run().await;
    Ok(())
}

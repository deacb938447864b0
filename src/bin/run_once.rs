//! Runs a single pass and exits. Handy for cron setups and for checking credentials.
//! Exit status is non-zero when the pass did not send an email.

use scholarship_tracker::{bootstrap, init_tracing, CountedTrigger, Scheduler};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let (_cfg, pipeline) = bootstrap()?;

    let mut scheduler = Scheduler::new(pipeline, CountedTrigger::new(1));
    scheduler.run().await;

    match scheduler.last_outcome() {
        Some(outcome) if outcome.is_sent() => {
            println!("run-once: email sent");
            Ok(())
        }
        Some(outcome) => anyhow::bail!("run-once: pass finished without email: {outcome}"),
        None => anyhow::bail!("run-once: no pass ran"),
    }
}

// Public library surface for the binaries and integration tests.

pub mod config;
pub mod error;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod runlog;
pub mod scheduler;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::config::Config;
pub use crate::error::TrackerError;
pub use crate::pipeline::{PassOutcome, Pipeline};
pub use crate::scheduler::{CountedTrigger, IntervalTrigger, Scheduler, Trigger};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact console logs. `RUST_LOG` overrides the default filter.
/// The run log file is written separately by `runlog::FileRunLog`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scholarship_tracker=info,runlog=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// Load `.env`, build the immutable config and the production pipeline.
/// Any error here is a startup failure.
pub fn bootstrap() -> anyhow::Result<(Config, Pipeline)> {
    // No-op when there is no .env file.
    let _ = dotenvy::dotenv();

    let cfg = Config::from_env()?;
    tracing::info!(config = ?cfg, "configuration loaded");
    let pipeline = Pipeline::from_config(&cfg)?;
    Ok((cfg, pipeline))
}

//! Periodic orchestration until Ctrl-C.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};
use trading_config::load_config;
use trading_core::TradingError;
use trading_engine::ShutdownSignal;

use crate::cli::DaemonArgs;

pub async fn run(args: DaemonArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let shutdown = ShutdownSignal::ctrl_c();
    let mut trader = super::build_trader(&config, &args.broker)?.with_shutdown(shutdown.clone());

    let every = args.interval_secs.unwrap_or(config.scheduler.interval_secs).max(1);
    let mut ticker = interval(Duration::from_secs(every));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_secs = every, strategies = trader.handlers().len(), "daemon started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.triggered() => break,
        }

        match trader.run_cycle().await {
            Ok(report) => info!(
                trades = report.trades().count(),
                failures = report.failures(),
                "cycle complete"
            ),
            Err(TradingError::Cancelled) => break,
            // The next tick is the retry
            Err(e) => error!(error = %e, "cycle aborted"),
        }
    }

    info!("daemon stopped");
    Ok(())
}

//! Single orchestration cycle.

use anyhow::{Context, Result};
use std::path::Path;
use trading_config::load_config;
use trading_engine::ShutdownSignal;

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let mut trader = super::build_trader(&config, &args.broker)?
        .with_shutdown(ShutdownSignal::ctrl_c());

    let report = trader.run_cycle().await.context("orchestration cycle aborted")?;
    println!("{}", report.summary());

    Ok(())
}

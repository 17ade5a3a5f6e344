//! CLI command implementations.

pub mod daemon;
pub mod orders;
pub mod run;
pub mod strategies;
pub mod validate;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use trading_broker::{AlpacaBroker, AlpacaConfig, PaperBroker};
use trading_config::AppConfig;
use trading_core::traits::{Broker, Strategy, SystemClock};
use trading_core::types::StrategyConfig;
use trading_data::{CsvBarSource, CsvOrderStore};
use trading_engine::ScheduledTrader;
use trading_strategies::StrategyRegistry;

use crate::cli::BrokerArgs;

/// Resolve every configured strategy through the registry.
pub fn strategy_bindings(config: &AppConfig) -> Result<Vec<(StrategyConfig, Box<dyn Strategy>)>> {
    let registry = StrategyRegistry::new();

    config
        .strategy_configs()
        .context("invalid strategy configuration")?
        .into_iter()
        .map(|(strategy_config, entry)| {
            let strategy = registry
                .create(&entry.strategy, entry.params.clone())
                .with_context(|| {
                    format!("strategy {} for {}", entry.strategy, strategy_config.symbol())
                })?;
            Ok::<_, anyhow::Error>((strategy_config, strategy))
        })
        .collect()
}

/// Completed-order store path, honoring a command-line override.
pub fn store_path(config: &AppConfig, over: Option<&PathBuf>) -> PathBuf {
    over.cloned()
        .unwrap_or_else(|| PathBuf::from(&config.store.path))
}

/// Build the scheduled trader described by `config`.
pub fn build_trader(config: &AppConfig, args: &BrokerArgs) -> Result<ScheduledTrader> {
    let bindings = strategy_bindings(config)?;

    let broker: Arc<dyn Broker> = match &args.paper_data {
        Some(dir) => {
            let mut broker = PaperBroker::new(config.paper.initial_capital)
                .with_slippage(config.paper.slippage_pct);
            let histories = CsvBarSource::new(dir)
                .load_all()
                .with_context(|| format!("loading paper data from {}", dir.display()))?;
            for (symbol, history) in histories {
                broker = broker.with_history(&symbol, history);
            }
            info!(dir = %dir.display(), "using paper broker");
            Arc::new(broker)
        }
        None => {
            let alpaca = AlpacaConfig::from_env_vars(
                &config.alpaca.api_key_env,
                &config.alpaca.api_secret_env,
                config.alpaca.paper,
            )?
            .with_bar_lookback_days(config.alpaca.bar_lookback_days)
            .with_polling(
                Duration::from_millis(config.alpaca.poll_interval_ms),
                Duration::from_secs(config.alpaca.fill_timeout_secs),
            );
            let broker = AlpacaBroker::new(alpaca)?;
            info!(broker = broker.name(), "using Alpaca broker");
            Arc::new(broker)
        }
    };

    let path = store_path(config, args.store.as_ref());
    let store = CsvOrderStore::open(&path)
        .with_context(|| format!("opening order store {}", path.display()))?;

    let trader = ScheduledTrader::new(bindings, broker, Arc::new(store), Arc::new(SystemClock))?;
    Ok(trader)
}

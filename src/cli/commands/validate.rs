//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use trading_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let bindings = match super::strategy_bindings(&config) {
        Ok(bindings) => bindings,
        Err(e) => {
            println!("Strategy error: {:#}", e);
            return Err(e);
        }
    };

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Alpaca paper mode: {}", config.alpaca.paper);
    println!("Order store: {}", config.store.path);
    println!("Cycle interval: {}s", config.scheduler.interval_secs);
    println!();
    println!("Strategies:");
    for (strategy_config, strategy) in &bindings {
        let note = if strategy_config.frequency().is_streaming() {
            " (streaming, not scheduled)"
        } else {
            ""
        };
        println!(
            "  {:<8} {:<16} {:<7} risk {}{}",
            strategy_config.symbol(),
            strategy.name(),
            strategy_config.frequency(),
            strategy_config.risk_fraction(),
            note
        );
    }

    Ok(())
}

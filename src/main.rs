//! Scheduled trader CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;
use trading_config::load_config;
use trading_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging, falling back to the configured log directory
    let log_dir = cli.log_dir.clone().or_else(|| {
        load_config(&cli.config)
            .ok()
            .and_then(|config| config.logging.file)
            .map(PathBuf::from)
    });
    let _log_guard = setup_logging(cli.log_level.as_str(), cli.json_logs, log_dir.as_deref());

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, &cli.config).await,
        Commands::Daemon(args) => cli::commands::daemon::run(args, &cli.config).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
        Commands::Orders(args) => cli::commands::orders::run(args, &cli.config).await,
    }
}

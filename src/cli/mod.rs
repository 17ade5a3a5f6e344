//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trader")]
#[command(author, version, about = "Throttled, strategy-driven scheduled trading")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Also write JSON logs to a daily-rolling file in this directory
    #[arg(long, env = "TRADER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one orchestration cycle
    Run(RunArgs),
    /// Run orchestration cycles on a fixed interval until Ctrl-C
    Daemon(DaemonArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
    /// Show completed orders and the derived position for a symbol
    Orders(OrdersArgs),
}

#[derive(clap::Args)]
pub struct BrokerArgs {
    /// Trade against a simulated broker seeded from {SYMBOL}.csv files here
    #[arg(long)]
    pub paper_data: Option<PathBuf>,

    /// Completed-order CSV file (overrides store.path)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub broker: BrokerArgs,
}

#[derive(clap::Args)]
pub struct DaemonArgs {
    #[command(flatten)]
    pub broker: BrokerArgs,

    /// Seconds between cycles (overrides scheduler.interval_secs)
    #[arg(long)]
    pub interval_secs: Option<u64>,
}

#[derive(clap::Args)]
pub struct OrdersArgs {
    /// Symbol to show
    #[arg(short = 'S', long)]
    pub symbol: String,

    /// Completed-order CSV file (overrides store.path)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

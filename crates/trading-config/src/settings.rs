//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use trading_core::error::StrategyError;
use trading_core::types::{StrategyConfig, TradingFrequency};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub paper: PaperSettings,
    #[serde(default)]
    pub strategies: Vec<StrategyEntry>,
}

impl AppConfig {
    /// Validate every strategy entry, in configuration order.
    ///
    /// Each (symbol, strategy) pair may appear only once.
    pub fn strategy_configs(&self) -> Result<Vec<(StrategyConfig, &StrategyEntry)>, StrategyError> {
        let mut seen = HashSet::new();
        let mut configs = Vec::with_capacity(self.strategies.len());

        for entry in &self.strategies {
            let config = StrategyConfig::new(&entry.symbol, entry.frequency, entry.risk_fraction)?;

            if !seen.insert((config.symbol().to_string(), entry.strategy.clone())) {
                return Err(StrategyError::InvalidConfig(format!(
                    "duplicate strategy {} for {}",
                    entry.strategy,
                    config.symbol()
                )));
            }

            configs.push((config, entry));
        }

        Ok(configs)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "scheduled-trader".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Directory for daily-rolling log files
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Alpaca API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaSettings {
    pub api_key_env: String,
    pub api_secret_env: String,
    pub paper: bool,
    pub bar_lookback_days: i64,
    pub poll_interval_ms: u64,
    pub fill_timeout_secs: u64,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            paper: true,
            bar_lookback_days: 60,
            poll_interval_ms: 500,
            fill_timeout_secs: 30,
        }
    }
}

/// Periodic trigger settings for daemon mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval_secs: 86_400,
        }
    }
}

/// Completed-order persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: "data/completed_orders.csv".to_string(),
        }
    }
}

/// Paper broker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperSettings {
    pub initial_capital: Decimal,
    pub slippage_pct: Decimal,
}

impl Default for PaperSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            initial_capital: dec!(100000),
            slippage_pct: dec!(0.05),
        }
    }
}

/// One symbol bound to one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub symbol: String,
    /// Registry name of the strategy
    pub strategy: String,
    #[serde(default)]
    pub frequency: TradingFrequency,
    pub risk_fraction: Decimal,
    /// Strategy parameters, passed through to the registry
    #[serde(default)]
    pub params: serde_json::Value,
}

//! Mean Reversion Strategy.
//!
//! Compares the latest close to the mean of the most recent closes.
//! A price at or below its rolling average is expected to revert upward
//! (buy); a price above it is expected to fall back (sell).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;
use trading_core::{
    error::StrategyError,
    traits::Strategy,
    types::{HistoricalWindow, Signal},
};

/// Configuration for the Mean Reversion strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionConfig {
    /// Number of most recent closes averaged
    pub lookback: usize,
}

impl Default for MeanReversionConfig {
    fn default() -> Self {
        Self { lookback: 20 }
    }
}

impl MeanReversionConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.lookback < 2 {
            return Err(StrategyError::InvalidConfig(
                "Mean reversion lookback must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// Mean Reversion Strategy.
#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    config: MeanReversionConfig,
}

impl MeanReversionStrategy {
    /// Create a new Mean Reversion strategy.
    pub fn new(config: MeanReversionConfig) -> Self {
        Self { config }
    }

    /// Arithmetic mean of the last `lookback` closes.
    fn rolling_mean(&self, window: &HistoricalWindow) -> Option<Decimal> {
        let recent = window.last_n(self.config.lookback);
        if recent.is_empty() {
            return None;
        }
        let sum: Decimal = recent.iter().map(|o| o.close).sum();
        Some(sum / Decimal::from(recent.len()))
    }
}

impl Default for MeanReversionStrategy {
    fn default() -> Self {
        Self::new(MeanReversionConfig::default())
    }
}

impl Strategy for MeanReversionStrategy {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn description(&self) -> &str {
        "Buys when the latest close is at or below its rolling mean, sells otherwise"
    }

    fn evaluate(&self, window: &HistoricalWindow) -> Signal {
        if !self.has_enough_history(window.len()) {
            return Signal::Undetermined;
        }

        let (Some(mean), Some(latest)) = (self.rolling_mean(window), window.last()) else {
            return Signal::Undetermined;
        };

        trace!(symbol = window.symbol(), %mean, latest = %latest.close, "mean reversion evaluated");

        if mean >= latest.close {
            Signal::Buy
        } else {
            Signal::Sell
        }
    }

    fn min_lookback(&self) -> usize {
        self.config.lookback
    }
}

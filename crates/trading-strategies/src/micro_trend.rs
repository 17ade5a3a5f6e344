//! Micro Trend Strategy.
//!
//! Follows very short runs: a streak of rising closes buys, a streak of
//! falling closes sells, anything mixed holds.

use serde::{Deserialize, Serialize};
use trading_core::{
    error::StrategyError,
    traits::Strategy,
    types::{HistoricalWindow, Signal},
};

/// Configuration for the Micro Trend strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroTrendConfig {
    /// Number of consecutive close-to-close moves that must agree
    pub lookback: usize,
}

impl Default for MicroTrendConfig {
    fn default() -> Self {
        Self { lookback: 3 }
    }
}

impl MicroTrendConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.lookback == 0 {
            return Err(StrategyError::InvalidConfig(
                "Micro trend lookback must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Micro Trend Strategy.
#[derive(Debug, Clone)]
pub struct MicroTrendStrategy {
    config: MicroTrendConfig,
}

impl MicroTrendStrategy {
    /// Create a new Micro Trend strategy.
    pub fn new(config: MicroTrendConfig) -> Self {
        Self { config }
    }
}

impl Default for MicroTrendStrategy {
    fn default() -> Self {
        Self::new(MicroTrendConfig::default())
    }
}

impl Strategy for MicroTrendStrategy {
    fn name(&self) -> &str {
        "micro_trend"
    }

    fn description(&self) -> &str {
        "Buys after a streak of rising closes, sells after a streak of falling closes"
    }

    fn evaluate(&self, window: &HistoricalWindow) -> Signal {
        if !self.has_enough_history(window.len()) {
            return Signal::Undetermined;
        }

        let recent = window.last_n(self.min_lookback());
        let moves: Vec<_> = recent
            .windows(2)
            .map(|pair| pair[1].close.cmp(&pair[0].close))
            .collect();

        if moves.iter().all(|m| m.is_gt()) {
            Signal::Buy
        } else if moves.iter().all(|m| m.is_lt()) {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn min_lookback(&self) -> usize {
        self.config.lookback + 1
    }
}

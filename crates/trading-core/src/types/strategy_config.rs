//! Per-symbol strategy configuration.

use rust_decimal::Decimal;
use serde::Serialize;

use super::TradingFrequency;
use crate::error::StrategyError;

/// Immutable pairing of a symbol with its trading frequency and risk.
///
/// Constructed only through [`StrategyConfig::new`], which enforces a
/// non-empty symbol and a risk fraction in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyConfig {
    symbol: String,
    frequency: TradingFrequency,
    risk_fraction: Decimal,
}

impl StrategyConfig {
    /// Create a validated configuration.
    pub fn new(
        symbol: impl Into<String>,
        frequency: TradingFrequency,
        risk_fraction: Decimal,
    ) -> Result<Self, StrategyError> {
        let symbol = symbol.into().trim().to_uppercase();
        if symbol.is_empty() {
            return Err(StrategyError::InvalidConfig("Symbol must not be empty".into()));
        }
        if risk_fraction <= Decimal::ZERO || risk_fraction > Decimal::ONE {
            return Err(StrategyError::InvalidConfig(format!(
                "Risk fraction for {} must be in (0, 1], got {}",
                symbol, risk_fraction
            )));
        }

        Ok(Self {
            symbol,
            frequency,
            risk_fraction,
        })
    }

    /// Symbol traded.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Trading frequency.
    pub fn frequency(&self) -> TradingFrequency {
        self.frequency
    }

    /// Fraction of equity committable to one buy order.
    pub fn risk_fraction(&self) -> Decimal {
        self.risk_fraction
    }
}

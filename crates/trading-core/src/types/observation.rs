//! Price observation type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single closing-price observation for one symbol.
///
/// Uses Decimal for exact arithmetic; observations feed order sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Symbol identifier
    pub symbol: String,
    /// Bar timestamp
    pub timestamp: DateTime<Utc>,
    /// Closing price
    pub close: Decimal,
}

impl PriceObservation {
    /// Create a new observation.
    pub fn new(symbol: impl Into<String>, timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close,
        }
    }
}

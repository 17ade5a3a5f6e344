//! Trading frequency definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a strategy is meant to trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradingFrequency {
    /// Every minute bar, driven by a streaming feed
    Minute,
    /// Once per scheduled run
    #[default]
    Daily,
}

impl TradingFrequency {
    /// Finest-grained frequencies are driven by a feed, not the scheduler.
    pub fn is_streaming(&self) -> bool {
        matches!(self, TradingFrequency::Minute)
    }
}

impl fmt::Display for TradingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradingFrequency::Minute => "minute",
            TradingFrequency::Daily => "daily",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TradingFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "minute" => Ok(TradingFrequency::Minute),
            "1d" | "day" | "daily" => Ok(TradingFrequency::Daily),
            _ => Err(format!("Invalid trading frequency: {}", s)),
        }
    }
}

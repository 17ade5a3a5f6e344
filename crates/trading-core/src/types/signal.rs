//! Trading signal produced by a strategy evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of one strategy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Hold,
    Sell,
    /// Not enough history to decide. A no-op, never an error.
    Undetermined,
}

impl Signal {
    /// Whether this signal can lead to an order.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Signal::Buy | Signal::Sell)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
            Signal::Undetermined => "UNDETERMINED",
        };
        write!(f, "{}", s)
    }
}

//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side implied by a signed share count.
    pub fn from_shares(shares: Decimal) -> Self {
        if shares.is_sign_negative() {
            Side::Sell
        } else {
            Side::Buy
        }
    }

    /// Get the sign for position calculations (+1 for buy, -1 for sell).
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => -Decimal::ONE,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Why an order is being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderIntent {
    /// Commit a slice of equity to a new long
    Open,
    /// Exit the whole held position
    Liquidate,
}

/// Order request handed to the broker.
///
/// `shares` is signed: positive buys, negative sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Signed number of shares
    pub shares: Decimal,
    /// Reason for the order
    pub intent: OrderIntent,
}

impl OrderRequest {
    /// Create a buy request for `shares` whole shares.
    pub fn open(symbol: impl Into<String>, shares: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            shares: shares.abs(),
            intent: OrderIntent::Open,
        }
    }

    /// Create a sell request that exits `held` shares.
    pub fn liquidate(symbol: impl Into<String>, held: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            shares: -held.abs(),
            intent: OrderIntent::Liquidate,
        }
    }

    /// Buy or sell.
    pub fn side(&self) -> Side {
        Side::from_shares(self.shares)
    }

    /// Unsigned quantity to send to the broker.
    pub fn quantity(&self) -> Decimal {
        self.shares.abs()
    }
}

/// Broker confirmation of what actually executed.
///
/// May differ from the request when the order was only partially filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Signed shares executed
    pub executed_shares: Decimal,
    /// Average execution price
    pub executed_price: Decimal,
}

impl Fill {
    /// Create a new fill.
    pub fn new(executed_shares: Decimal, executed_price: Decimal) -> Self {
        Self {
            executed_shares,
            executed_price,
        }
    }

    /// Nothing executed.
    pub fn is_empty(&self) -> bool {
        self.executed_shares.is_zero()
    }
}

/// Durable record of an executed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedOrder {
    /// Symbol traded
    pub symbol: String,
    /// Realized price per share
    pub market_price: Decimal,
    /// Signed shares actually executed
    pub shares_bought: Decimal,
    /// When the fill was confirmed
    pub order_placed_time: DateTime<Utc>,
}

impl CompletedOrder {
    /// Build the record for a confirmed fill.
    pub fn from_fill(symbol: impl Into<String>, fill: &Fill, placed_at: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            market_price: fill.executed_price,
            shares_bought: fill.executed_shares,
            order_placed_time: placed_at,
        }
    }

    /// Signed cash flow of the trade (negative for buys).
    pub fn cash_flow(&self) -> Decimal {
        -(self.shares_bought * self.market_price)
    }
}

/// Time of the newest completed order, if any.
pub fn last_order_time<'a>(
    orders: impl IntoIterator<Item = &'a CompletedOrder>,
) -> Option<DateTime<Utc>> {
    orders.into_iter().map(|o| o.order_placed_time).max()
}

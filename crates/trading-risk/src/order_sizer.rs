//! Order sizing.

use rust_decimal::Decimal;
use tracing::debug;
use trading_core::types::{OrderRequest, Signal};

/// Turns a signal into an order request.
///
/// Buys commit `equity * risk_fraction` worth of whole shares. Sells always
/// exit the entire held position. Everything else produces no order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderSizer;

impl OrderSizer {
    /// Create a new order sizer.
    pub fn new() -> Self {
        Self
    }

    /// Size an order for `symbol`.
    ///
    /// `equity` should be read fresh for each decision. `held_shares` is the
    /// current position in the symbol and only matters for sells.
    pub fn size(
        &self,
        symbol: &str,
        signal: Signal,
        equity: Decimal,
        risk_fraction: Decimal,
        current_price: Decimal,
        held_shares: Decimal,
    ) -> Option<OrderRequest> {
        match signal {
            Signal::Buy => {
                if current_price <= Decimal::ZERO || equity <= Decimal::ZERO {
                    return None;
                }

                let shares = (equity * risk_fraction / current_price).floor();
                debug!(symbol, %equity, %risk_fraction, %current_price, %shares, "sized buy");

                if shares.is_zero() {
                    None
                } else {
                    Some(OrderRequest::open(symbol, shares))
                }
            }
            Signal::Sell => {
                if held_shares > Decimal::ZERO {
                    debug!(symbol, %held_shares, "sized liquidation");
                    Some(OrderRequest::liquidate(symbol, held_shares))
                } else {
                    None
                }
            }
            Signal::Hold | Signal::Undetermined => None,
        }
    }
}

//! Position derived from completed orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CompletedOrder;

/// Running holding in a single security.
///
/// Never stored; rebuilt from the completed-order history on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Number of shares (positive for long, negative for short)
    pub quantity: Decimal,
    /// Average entry price
    pub avg_entry_price: Decimal,
    /// Realized profit/loss from closed portions
    pub realized_pnl: Decimal,
    /// Number of completed orders folded in
    pub trades: usize,
}

impl Position {
    /// Create a flat position.
    pub fn flat(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: Decimal::ZERO,
            avg_entry_price: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            trades: 0,
        }
    }

    /// Aggregate every completed order for `symbol`, in placement order.
    pub fn from_orders<'a>(
        symbol: &str,
        orders: impl IntoIterator<Item = &'a CompletedOrder>,
    ) -> Self {
        let mut relevant: Vec<&CompletedOrder> =
            orders.into_iter().filter(|o| o.symbol == symbol).collect();
        relevant.sort_by_key(|o| o.order_placed_time);

        let mut position = Self::flat(symbol);
        for order in relevant {
            position.apply_fill(order.shares_bought, order.market_price);
        }
        position
    }

    /// Check if this is a long position.
    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Check if the position is flat (no shares).
    pub fn is_flat(&self) -> bool {
        self.quantity == Decimal::ZERO
    }

    /// Cost basis (quantity * avg_entry_price).
    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.avg_entry_price
    }

    /// Apply a signed fill to the position.
    /// Returns the realized P&L if the position is being reduced.
    pub fn apply_fill(&mut self, shares: Decimal, price: Decimal) -> Decimal {
        self.trades += 1;
        let mut realized = Decimal::ZERO;

        let same_direction = (self.quantity > Decimal::ZERO && shares > Decimal::ZERO)
            || (self.quantity < Decimal::ZERO && shares < Decimal::ZERO);

        if same_direction || self.quantity == Decimal::ZERO {
            // Adding to position - update average entry price
            let total_cost = self.quantity * self.avg_entry_price + shares * price;
            let new_quantity = self.quantity + shares;

            if new_quantity != Decimal::ZERO {
                self.avg_entry_price = total_cost / new_quantity;
            }
            self.quantity = new_quantity;
        } else {
            let close_qty = shares.abs().min(self.quantity.abs());

            realized = if self.quantity > Decimal::ZERO {
                close_qty * (price - self.avg_entry_price)
            } else {
                close_qty * (self.avg_entry_price - price)
            };
            self.realized_pnl += realized;

            let remaining = shares.abs() - close_qty;
            if remaining > Decimal::ZERO {
                // Position reversed
                self.quantity = if shares.is_sign_negative() {
                    -remaining
                } else {
                    remaining
                };
                self.avg_entry_price = price;
            } else {
                self.quantity += shares;
                if self.quantity == Decimal::ZERO {
                    self.avg_entry_price = Decimal::ZERO;
                }
            }
        }

        realized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fill;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn order(symbol: &str, secs: i64, shares: Decimal, price: Decimal) -> CompletedOrder {
        CompletedOrder::from_fill(
            symbol,
            &Fill::new(shares, price),
            DateTime::from_timestamp(secs, 0).unwrap(),
        )
    }

    #[test]
    fn test_position_apply_fill_increase() {
        let mut position = Position::flat("AAPL");
        position.apply_fill(dec!(100), dec!(150.00));

        let realized = position.apply_fill(dec!(100), dec!(160.00));
        assert_eq!(realized, Decimal::ZERO);
        assert_eq!(position.quantity, dec!(200));
        assert_eq!(position.avg_entry_price, dec!(155.00));
    }

    #[test]
    fn test_position_apply_fill_close() {
        let mut position = Position::flat("AAPL");
        position.apply_fill(dec!(100), dec!(150.00));

        let realized = position.apply_fill(dec!(-100), dec!(160.00));
        assert_eq!(realized, dec!(1000.00));
        assert!(position.is_flat());
        assert_eq!(position.avg_entry_price, Decimal::ZERO);
    }

    #[test]
    fn test_from_orders_filters_symbol_and_sorts() {
        let orders = vec![
            order("XYZ", 300, dec!(-50), dec!(110)),
            order("ABC", 100, dec!(10), dec!(5)),
            order("XYZ", 100, dec!(150), dec!(100)),
        ];

        let position = Position::from_orders("XYZ", &orders);
        assert_eq!(position.quantity, dec!(100));
        assert_eq!(position.avg_entry_price, dec!(100));
        assert_eq!(position.realized_pnl, dec!(500));
        assert_eq!(position.trades, 2);
        assert!(position.is_long());
        assert_eq!(position.cost_basis(), dec!(10000));
    }

    #[test]
    fn test_from_orders_empty_is_flat() {
        let position = Position::from_orders("XYZ", &Vec::<CompletedOrder>::new());
        assert!(position.is_flat());
        assert_eq!(position.trades, 0);
    }
}

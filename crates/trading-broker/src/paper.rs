//! Paper trading broker for dry runs and simulation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use trading_core::error::BrokerError;
use trading_core::traits::Broker;
use trading_core::types::{Fill, OrderRequest, PriceObservation, Side};

#[derive(Debug, Default)]
struct PaperAccount {
    cash: Decimal,
    holdings: HashMap<String, Decimal>,
    history: HashMap<String, Vec<PriceObservation>>,
}

impl PaperAccount {
    fn latest_close(&self, symbol: &str) -> Option<Decimal> {
        self.history
            .get(symbol)
            .and_then(|bars| bars.last())
            .map(|bar| bar.close)
    }
}

/// Simulated broker that fills market orders at the latest close.
pub struct PaperBroker {
    account: Mutex<PaperAccount>,
    slippage_pct: Decimal,
}

impl PaperBroker {
    /// Create a new paper broker with initial capital.
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            account: Mutex::new(PaperAccount {
                cash: initial_capital,
                ..Default::default()
            }),
            slippage_pct: dec!(0.05), // 0.05% slippage
        }
    }

    /// Set slippage percentage.
    pub fn with_slippage(mut self, slippage_pct: Decimal) -> Self {
        self.slippage_pct = slippage_pct;
        self
    }

    /// Seed a symbol's price history.
    ///
    /// The broker is owned here, so a poisoned lock is recovered rather
    /// than losing the seed.
    pub fn with_history(mut self, symbol: &str, mut history: Vec<PriceObservation>) -> Self {
        history.sort_by_key(|o| o.timestamp);
        let account = self
            .account
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        account.history.insert(symbol.to_string(), history);
        self
    }

    /// Publish a new observation, moving the simulated market forward.
    pub fn push_observation(&self, observation: PriceObservation) -> Result<(), BrokerError> {
        let mut account = self.account()?;
        account
            .history
            .entry(observation.symbol.clone())
            .or_default()
            .push(observation);
        Ok(())
    }

    /// Uninvested cash.
    pub fn cash(&self) -> Result<Decimal, BrokerError> {
        Ok(self.account()?.cash)
    }

    /// Shares currently held in `symbol`.
    pub fn holding(&self, symbol: &str) -> Result<Decimal, BrokerError> {
        Ok(self
            .account()?
            .holdings
            .get(symbol)
            .copied()
            .unwrap_or_default())
    }

    fn account(&self) -> Result<MutexGuard<'_, PaperAccount>, BrokerError> {
        self.account
            .lock()
            .map_err(|_| BrokerError::ApiError("paper account lock poisoned".into()))
    }

    fn fill_price(&self, side: Side, market_price: Decimal) -> Decimal {
        match side {
            Side::Buy => market_price * (dec!(1) + self.slippage_pct / dec!(100)),
            Side::Sell => market_price * (dec!(1) - self.slippage_pct / dec!(100)),
        }
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn get_historical_bars(
        &self,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, BrokerError> {
        match self.account()?.history.get(symbol) {
            Some(bars) if !bars.is_empty() => Ok(bars.clone()),
            _ => Err(BrokerError::InvalidSymbol(symbol.to_string())),
        }
    }

    async fn get_account_equity(&self) -> Result<Decimal, BrokerError> {
        let account = self.account()?;
        let invested: Decimal = account
            .holdings
            .iter()
            .map(|(symbol, shares)| *shares * account.latest_close(symbol).unwrap_or_default())
            .sum();
        Ok(account.cash + invested)
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<Fill, BrokerError> {
        let mut account = self.account()?;

        let market_price = account
            .latest_close(&request.symbol)
            .ok_or_else(|| BrokerError::InvalidSymbol(request.symbol.clone()))?;

        let side = request.side();
        let quantity = request.quantity();
        let price = self.fill_price(side, market_price);
        let value = price * quantity;
        let held = account
            .holdings
            .get(&request.symbol)
            .copied()
            .unwrap_or_default();

        match side {
            Side::Buy => {
                if value > account.cash {
                    return Err(BrokerError::OrderRejected(format!(
                        "insufficient cash: need {} have {}",
                        value, account.cash
                    )));
                }
                account.cash -= value;
            }
            Side::Sell => {
                if quantity > held {
                    return Err(BrokerError::OrderRejected(format!(
                        "cannot sell {} {}: holding {}",
                        quantity, request.symbol, held
                    )));
                }
                account.cash += value;
            }
        }

        let remaining = held + request.shares;
        if remaining.is_zero() {
            account.holdings.remove(&request.symbol);
        } else {
            account.holdings.insert(request.symbol.clone(), remaining);
        }

        debug!(symbol = %request.symbol, %side, %quantity, %price, "paper order filled");
        Ok(Fill::new(request.shares, price))
    }

    fn name(&self) -> &str {
        "Paper Broker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn history(symbol: &str, closes: &[Decimal]) -> Vec<PriceObservation> {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| PriceObservation::new(symbol, start + Duration::days(i as i64), *c))
            .collect()
    }

    #[tokio::test]
    async fn test_paper_broker_buy() {
        let broker = PaperBroker::new(dec!(100000))
            .with_slippage(Decimal::ZERO)
            .with_history("AAPL", history("AAPL", &[dec!(140), dec!(150)]));

        let fill = broker
            .submit_order(&OrderRequest::open("AAPL", dec!(100)))
            .await
            .unwrap();

        assert_eq!(fill.executed_shares, dec!(100));
        assert_eq!(fill.executed_price, dec!(150));
        assert_eq!(broker.cash().unwrap(), dec!(85000));
        assert_eq!(broker.holding("AAPL").unwrap(), dec!(100));
        assert_eq!(broker.get_account_equity().await.unwrap(), dec!(100000));
    }

    #[tokio::test]
    async fn test_slippage_moves_price_against_the_order() {
        let broker = PaperBroker::new(dec!(100000))
            .with_history("AAPL", history("AAPL", &[dec!(100)]));

        let buy = broker
            .submit_order(&OrderRequest::open("AAPL", dec!(10)))
            .await
            .unwrap();
        assert_eq!(buy.executed_price, dec!(100.05));

        let sell = broker
            .submit_order(&OrderRequest::liquidate("AAPL", dec!(10)))
            .await
            .unwrap();
        assert_eq!(sell.executed_shares, dec!(-10));
        assert_eq!(sell.executed_price, dec!(99.95));
        assert_eq!(broker.holding("AAPL").unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_rejects_buy_over_cash() {
        let broker = PaperBroker::new(dec!(1000))
            .with_history("AAPL", history("AAPL", &[dec!(150)]));

        let result = broker
            .submit_order(&OrderRequest::open("AAPL", dec!(100)))
            .await;

        assert!(matches!(result, Err(BrokerError::OrderRejected(_))));
        assert_eq!(broker.cash().unwrap(), dec!(1000));
    }

    #[tokio::test]
    async fn test_rejects_sell_over_holdings() {
        let broker = PaperBroker::new(dec!(1000))
            .with_history("AAPL", history("AAPL", &[dec!(150)]));

        let result = broker
            .submit_order(&OrderRequest::liquidate("AAPL", dec!(5)))
            .await;

        assert!(matches!(result, Err(BrokerError::OrderRejected(_))));
    }

    #[tokio::test]
    async fn test_unknown_symbol_has_no_bars() {
        let broker = PaperBroker::new(dec!(1000));

        let result = broker.get_historical_bars("NOPE").await;
        assert!(matches!(result, Err(BrokerError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_pushed_observation_becomes_latest() {
        let broker = PaperBroker::new(dec!(1000))
            .with_history("AAPL", history("AAPL", &[dec!(150)]));

        let next = history("AAPL", &[dec!(150), dec!(160)]).pop().unwrap();
        broker.push_observation(next).unwrap();

        let bars = broker.get_historical_bars("AAPL").await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, dec!(160));
    }

    #[test]
    fn test_seeding_survives_poisoned_lock() {
        let broker = PaperBroker::new(dec!(1000));
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _account = broker.account.lock().unwrap();
            panic!("poison the paper account");
        }));
        assert!(broker.account.is_poisoned());

        let mut broker = broker.with_history("AAPL", history("AAPL", &[dec!(150), dec!(151)]));

        let account = broker
            .account
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        assert_eq!(account.history["AAPL"].len(), 2);
    }
}

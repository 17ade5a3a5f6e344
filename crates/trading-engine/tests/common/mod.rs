//! Scripted collaborators for scheduler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use trading_core::error::{BrokerError, StorageError};
use trading_core::traits::{Broker, FixedClock, OrderStore, Strategy};
use trading_core::types::{
    CompletedOrder, Fill, OrderRequest, PriceObservation, StrategyConfig, TradingFrequency,
};
use trading_data::InMemoryOrderStore;
use trading_engine::ScheduledTrader;
use trading_strategies::MeanReversionStrategy;

/// What the broker answers for a symbol's bar request.
#[derive(Clone)]
pub enum BarsScript {
    Bars(Vec<PriceObservation>),
    Empty,
    Unreachable,
}

/// What the broker does with a submitted order.
#[derive(Clone, Copy)]
pub enum FillScript {
    /// Fill everything at the latest close
    Full,
    /// Fill this fraction of the requested shares, floored
    Partial(Decimal),
    Reject,
    /// Accepted, but the fill could not be confirmed
    Unresolved,
}

/// Broker double driven by per-symbol scripts.
pub struct ScriptedBroker {
    pub equity: Decimal,
    bars: HashMap<String, BarsScript>,
    fills: HashMap<String, FillScript>,
    pub submitted: Mutex<Vec<OrderRequest>>,
    pub equity_reads: Mutex<usize>,
}

impl ScriptedBroker {
    pub fn new(equity: Decimal) -> Self {
        Self {
            equity,
            bars: HashMap::new(),
            fills: HashMap::new(),
            submitted: Mutex::new(Vec::new()),
            equity_reads: Mutex::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, script: BarsScript) -> Self {
        self.bars.insert(symbol.to_string(), script);
        self
    }

    pub fn with_fill(mut self, symbol: &str, script: FillScript) -> Self {
        self.fills.insert(symbol.to_string(), script);
        self
    }

    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.submitted.lock().unwrap().clone()
    }

    fn latest_close(&self, symbol: &str) -> Decimal {
        match self.bars.get(symbol) {
            Some(BarsScript::Bars(bars)) => bars.last().map(|b| b.close).unwrap_or_default(),
            _ => Decimal::ZERO,
        }
    }
}

#[async_trait]
impl Broker for ScriptedBroker {
    async fn get_historical_bars(
        &self,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, BrokerError> {
        match self.bars.get(symbol) {
            Some(BarsScript::Bars(bars)) => Ok(bars.clone()),
            Some(BarsScript::Empty) => Ok(Vec::new()),
            Some(BarsScript::Unreachable) => {
                Err(BrokerError::Connection("connection reset".into()))
            }
            None => Err(BrokerError::InvalidSymbol(symbol.to_string())),
        }
    }

    async fn get_account_equity(&self) -> Result<Decimal, BrokerError> {
        *self.equity_reads.lock().unwrap() += 1;
        Ok(self.equity)
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<Fill, BrokerError> {
        self.submitted.lock().unwrap().push(request.clone());
        let price = self.latest_close(&request.symbol);

        match self.fills.get(&request.symbol).copied().unwrap_or(FillScript::Full) {
            FillScript::Full => Ok(Fill::new(request.shares, price)),
            FillScript::Partial(ratio) => Ok(Fill::new((request.shares * ratio).floor(), price)),
            FillScript::Reject => Err(BrokerError::OrderRejected("insufficient buying power".into())),
            FillScript::Unresolved => Err(BrokerError::OrderUnresolved("abc: connection reset".into())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Store that reads fine but refuses every write.
#[derive(Default)]
pub struct ReadOnlyStore;

#[async_trait]
impl OrderStore for ReadOnlyStore {
    async fn completed_orders(
        &self,
        _config: &StrategyConfig,
    ) -> Result<Vec<CompletedOrder>, StorageError> {
        Ok(Vec::new())
    }

    async fn record_completed_order(&self, _order: CompletedOrder) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }
}

/// Fixed reference instant.
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Daily observations ending the day before `t0`.
pub fn daily_bars(symbol: &str, closes: &[Decimal]) -> Vec<PriceObservation> {
    let first = t0() - Duration::days(closes.len() as i64);
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PriceObservation::new(symbol, first + Duration::days(i as i64), *close))
        .collect()
}

/// Nineteen closes at `base` followed by one at `last`.
pub fn reversion_closes(base: Decimal, last: Decimal) -> Vec<Decimal> {
    let mut closes = vec![base; 19];
    closes.push(last);
    closes
}

pub fn daily(symbol: &str, risk_fraction: Decimal) -> StrategyConfig {
    StrategyConfig::new(symbol, TradingFrequency::Daily, risk_fraction).unwrap()
}

pub fn mean_reversion() -> Box<dyn Strategy> {
    Box::new(MeanReversionStrategy::default())
}

/// A completed buy placed at `at`.
pub fn past_order(symbol: &str, at: DateTime<Utc>) -> CompletedOrder {
    CompletedOrder::from_fill(symbol, &Fill::new(dec!(10), dec!(100)), at)
}

/// Scheduler over mean-reversion bindings for `symbols`, all at 10% risk.
pub fn trader(
    symbols: &[&str],
    broker: Arc<ScriptedBroker>,
    store: Arc<InMemoryOrderStore>,
    now: DateTime<Utc>,
) -> ScheduledTrader {
    let bindings = symbols
        .iter()
        .map(|symbol| (daily(symbol, dec!(0.1)), mean_reversion()))
        .collect();
    ScheduledTrader::new(bindings, broker, store, Arc::new(FixedClock(now))).unwrap()
}

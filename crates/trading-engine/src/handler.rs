//! Per-symbol strategy handler.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use trading_core::{
    error::TradingError,
    traits::{Broker, Clock, OrderStore, Strategy},
    types::{
        CompletedOrder, HistoricalWindow, OrderRequest, Position, PriceObservation, Signal,
        StrategyConfig,
    },
    TradingResult,
};
use trading_risk::OrderSizer;

/// What a trade cycle ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    /// An order filled and was persisted
    Traded(CompletedOrder),
    /// The signal did not size into an order
    NoOrder(Signal),
    /// The broker accepted the order but reported nothing executed
    Unfilled(OrderRequest),
    /// Nothing newer than the window's last observation arrived
    NoNewData,
}

/// Owns one symbol's window and trades it with one strategy.
pub struct StrategyHandler {
    config: StrategyConfig,
    strategy: Box<dyn Strategy>,
    window: HistoricalWindow,
    sizer: OrderSizer,
    broker: Arc<dyn Broker>,
    store: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
}

impl StrategyHandler {
    /// Create a handler with an empty window.
    pub fn new(
        config: StrategyConfig,
        strategy: Box<dyn Strategy>,
        broker: Arc<dyn Broker>,
        store: Arc<dyn OrderStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let window = HistoricalWindow::new(config.symbol());
        Self {
            config,
            strategy,
            window,
            sizer: OrderSizer::new(),
            broker,
            store,
            clock,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn symbol(&self) -> &str {
        self.config.symbol()
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Read-only view of the window.
    pub fn window(&self) -> &HistoricalWindow {
        &self.window
    }

    /// Evaluate the strategy against the current window.
    pub fn evaluate(&self) -> Signal {
        self.strategy.evaluate(&self.window)
    }

    /// Reset the window, for replaying history from scratch.
    pub fn clear(&mut self) {
        self.window.clear();
    }

    /// Replace the window contents without trading.
    pub fn seed(&mut self, observations: Vec<PriceObservation>) -> TradingResult<()> {
        for observation in &observations {
            self.check_symbol(observation)?;
        }
        self.window.seed(observations);
        Ok(())
    }

    /// Add an observation to the window without trading.
    pub fn append(&mut self, observation: PriceObservation) -> TradingResult<()> {
        self.check_symbol(&observation)?;
        self.window.append(observation);
        Ok(())
    }

    /// Append `observation`, then evaluate, size, submit and record.
    ///
    /// The observation stays in the window even when the broker fails.
    /// A completed order is persisted only after the broker confirms a fill,
    /// with the executed quantity and price rather than the requested ones.
    pub async fn handle_new_data(
        &mut self,
        observation: PriceObservation,
    ) -> TradingResult<TradeOutcome> {
        self.append(observation)?;

        let signal = self.evaluate();
        debug!(
            symbol = self.symbol(),
            strategy = self.strategy_name(),
            window = self.window.len(),
            %signal,
            "strategy evaluated"
        );

        let Some(request) = self.size_order(signal).await? else {
            return Ok(TradeOutcome::NoOrder(signal));
        };

        info!(
            symbol = %request.symbol,
            side = %request.side(),
            shares = %request.quantity(),
            broker = self.broker.name(),
            "submitting order"
        );
        let fill = self.broker.submit_order(&request).await?;

        if fill.is_empty() {
            warn!(symbol = %request.symbol, "broker reported no executed shares");
            return Ok(TradeOutcome::Unfilled(request));
        }

        let order = CompletedOrder::from_fill(self.symbol(), &fill, self.clock.now());
        self.store.record_completed_order(order.clone()).await?;

        info!(
            symbol = %order.symbol,
            shares = %order.shares_bought,
            price = %order.market_price,
            requested = %request.shares,
            "order filled"
        );
        Ok(TradeOutcome::Traded(order))
    }

    /// Merge a freshly fetched bar history into the window and trade on it.
    ///
    /// Only bars strictly newer than the window's newest observation count.
    /// All but the newest are appended silently; the newest goes through
    /// [`StrategyHandler::handle_new_data`].
    pub async fn run_cycle(
        &mut self,
        bars: Vec<PriceObservation>,
    ) -> TradingResult<TradeOutcome> {
        let newest = self.window.newest_timestamp();
        let mut fresh: Vec<PriceObservation> = bars
            .into_iter()
            .filter(|bar| newest.map_or(true, |seen| bar.timestamp > seen))
            .collect();
        fresh.sort_by_key(|bar| bar.timestamp);

        let Some(latest) = fresh.pop() else {
            debug!(
                symbol = self.symbol(),
                signal = %self.evaluate(),
                "no new market data"
            );
            return Ok(TradeOutcome::NoNewData);
        };

        for bar in fresh {
            self.append(bar)?;
        }
        self.handle_new_data(latest).await
    }

    async fn size_order(&self, signal: Signal) -> TradingResult<Option<OrderRequest>> {
        let Some(latest) = self.window.last() else {
            return Ok(None);
        };

        let (equity, held) = match signal {
            Signal::Buy => (self.broker.get_account_equity().await?, Decimal::ZERO),
            Signal::Sell => {
                let orders = self.store.completed_orders(&self.config).await?;
                let position = Position::from_orders(self.symbol(), &orders);
                (Decimal::ZERO, position.quantity)
            }
            Signal::Hold | Signal::Undetermined => return Ok(None),
        };

        Ok(self.sizer.size(
            self.symbol(),
            signal,
            equity,
            self.config.risk_fraction(),
            latest.close,
            held,
        ))
    }

    fn check_symbol(&self, observation: &PriceObservation) -> TradingResult<()> {
        if observation.symbol != self.symbol() {
            return Err(TradingError::Validation(format!(
                "observation for {} given to the {} handler",
                observation.symbol,
                self.symbol()
            )));
        }
        Ok(())
    }
}

//! Throttled, sequential trade scheduler.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};
use trading_core::{
    error::{BrokerError, TradingError},
    traits::{Broker, Clock, OrderStore, Strategy},
    types::{last_order_time, StrategyConfig},
    TradingResult,
};

use crate::{CycleReport, ShutdownSignal, StrategyHandler, StrategyReport, StrategyResult};

/// Minimum spacing between two completed trades in one symbol: one day
/// plus a one-minute margin.
pub fn throttle_interval() -> Duration {
    Duration::days(1) + Duration::minutes(1)
}

/// Time left before a symbol may trade again.
///
/// `None` means the symbol is eligible now: either it never traded, or
/// `last_order + throttle_interval()` is not after `now`.
pub fn throttle_wait(last_order: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<Duration> {
    let eligible_at = last_order? + throttle_interval();
    (eligible_at > now).then(|| eligible_at - now)
}

/// Runs every configured daily strategy once per cycle.
///
/// Strategies are processed strictly in configuration order, one at a time,
/// so no two sizing decisions ever read account equity concurrently.
pub struct ScheduledTrader {
    handlers: Vec<StrategyHandler>,
    broker: Arc<dyn Broker>,
    store: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
}

impl ScheduledTrader {
    /// Bind each configuration to its strategy.
    ///
    /// Minute-frequency strategies are left to a streaming driver and
    /// skipped here. A repeated (symbol, strategy) pair is a configuration
    /// error.
    pub fn new(
        bindings: Vec<(StrategyConfig, Box<dyn Strategy>)>,
        broker: Arc<dyn Broker>,
        store: Arc<dyn OrderStore>,
        clock: Arc<dyn Clock>,
    ) -> TradingResult<Self> {
        let mut seen = HashSet::new();
        let mut handlers = Vec::with_capacity(bindings.len());
        let mut skipped = 0;

        for (config, strategy) in bindings {
            let key = (config.symbol().to_string(), strategy.name().to_string());
            if !seen.insert(key) {
                return Err(TradingError::Config(format!(
                    "{} is bound to {} more than once",
                    config.symbol(),
                    strategy.name()
                )));
            }

            if config.frequency().is_streaming() {
                skipped += 1;
                continue;
            }

            handlers.push(StrategyHandler::new(
                config,
                strategy,
                broker.clone(),
                store.clone(),
                clock.clone(),
            ));
        }

        if skipped > 0 {
            info!(skipped, "minute-frequency strategies left to the streaming driver");
        }

        Ok(Self {
            handlers,
            broker,
            store,
            clock,
            shutdown: ShutdownSignal::new(),
        })
    }

    /// Use `shutdown` to cancel pending waits.
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn handlers(&self) -> &[StrategyHandler] {
        &self.handlers
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Run one orchestration cycle.
    ///
    /// Per strategy: fetch bars, wait out the throttle, then trade. Order
    /// rejections and connection failures are recorded in the report and
    /// the cycle continues. An unknown symbol, an order whose fill cannot be
    /// confirmed, a storage failure or a shutdown aborts the cycle.
    pub async fn run_cycle(&mut self) -> TradingResult<CycleReport> {
        let mut report = CycleReport::new(self.clock.now());
        info!(strategies = self.handlers.len(), "orchestration cycle started");

        for handler in &mut self.handlers {
            if self.shutdown.is_triggered() {
                warn!("cycle cancelled");
                return Err(TradingError::Cancelled);
            }

            let symbol = handler.symbol().to_string();
            let strategy = handler.strategy_name().to_string();

            let bars = match self.broker.get_historical_bars(&symbol).await {
                Ok(bars) if bars.is_empty() => {
                    let err = TradingError::from(BrokerError::InvalidSymbol(symbol));
                    error!(error = %err, "aborting cycle");
                    return Err(err);
                }
                Ok(bars) => bars,
                Err(err) => {
                    let reason = recoverable(err.into())?;
                    warn!(%symbol, %strategy, %reason, "market data unavailable");
                    report.push(StrategyReport {
                        symbol,
                        strategy,
                        wait: None,
                        result: StrategyResult::Failed(reason),
                    });
                    continue;
                }
            };

            let orders = match self.store.completed_orders(handler.config()).await {
                Ok(orders) => orders,
                Err(err) => {
                    let err = TradingError::from(err);
                    error!(%symbol, error = %err, "aborting cycle");
                    return Err(err);
                }
            };

            let wait = throttle_wait(last_order_time(&orders), self.clock.now());
            if let Some(wait) = wait {
                info!(%symbol, %strategy, wait_secs = wait.num_seconds(), "throttled, waiting");
                let completed = self
                    .shutdown
                    .sleep(wait.to_std().unwrap_or_default())
                    .await;
                if !completed {
                    warn!(%symbol, "cycle cancelled during throttle wait");
                    return Err(TradingError::Cancelled);
                }
            }
            if self.shutdown.is_triggered() {
                warn!(%symbol, "cycle cancelled");
                return Err(TradingError::Cancelled);
            }

            let result = match handler.run_cycle(bars).await {
                Ok(outcome) => {
                    info!(%symbol, %strategy, ?outcome, "strategy cycle complete");
                    StrategyResult::Completed(outcome)
                }
                Err(err) => {
                    let reason = recoverable(err)?;
                    warn!(%symbol, %strategy, %reason, "strategy cycle failed");
                    StrategyResult::Failed(reason)
                }
            };

            report.push(StrategyReport {
                symbol,
                strategy,
                wait,
                result,
            });
        }

        report.finish(self.clock.now());
        info!(
            trades = report.trades().count(),
            failures = report.failures(),
            "orchestration cycle finished"
        );
        Ok(report)
    }
}

/// Pass fatal errors up; turn the rest into a report line.
fn recoverable(err: TradingError) -> TradingResult<String> {
    if err.is_fatal() {
        error!(error = %err, "aborting cycle");
        Err(err)
    } else {
        Ok(err.to_string())
    }
}

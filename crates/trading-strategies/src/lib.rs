//! Trading strategy implementations.
//!
//! Every strategy turns a symbol's historical window into a signal:
//! - Mean Reversion (rolling mean vs. latest close)
//! - Micro Trend (consecutive close-to-close moves)

mod mean_reversion;
mod micro_trend;
mod registry;

pub use mean_reversion::{MeanReversionConfig, MeanReversionStrategy};
pub use micro_trend::{MicroTrendConfig, MicroTrendStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::DateTime;
    use rust_decimal::Decimal;
    use trading_core::types::{HistoricalWindow, PriceObservation};

    /// Window of daily observations with the given closes, oldest first.
    pub fn window_of(closes: &[Decimal]) -> HistoricalWindow {
        let mut window = HistoricalWindow::new("TEST");
        for (i, &close) in closes.iter().enumerate() {
            window.append(PriceObservation::new(
                "TEST",
                DateTime::from_timestamp(i as i64 * 86_400, 0).unwrap(),
                close,
            ));
        }
        window
    }
}

//! Trading orchestration.
//!
//! A [`StrategyHandler`] owns one symbol's window and turns new observations
//! into orders. The [`ScheduledTrader`] drives every handler once per cycle,
//! waiting out each symbol's throttle before letting it trade.

mod handler;
mod report;
mod scheduler;
mod shutdown;

pub use handler::{StrategyHandler, TradeOutcome};
pub use report::{CycleReport, StrategyReport, StrategyResult};
pub use scheduler::{throttle_interval, throttle_wait, ScheduledTrader};
pub use shutdown::ShutdownSignal;

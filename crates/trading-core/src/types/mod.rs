//! Core data types for the scheduled trader.

mod frequency;
mod observation;
mod order;
mod position;
mod signal;
mod strategy_config;
mod window;

pub use frequency::TradingFrequency;
pub use observation::PriceObservation;
pub use order::{last_order_time, CompletedOrder, Fill, OrderIntent, OrderRequest, Side};
pub use position::Position;
pub use signal::Signal;
pub use strategy_config::StrategyConfig;
pub use window::HistoricalWindow;

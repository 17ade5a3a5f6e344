//! Core traits for the scheduled trader.

mod broker;
mod clock;
mod order_store;
mod strategy;

pub use broker::Broker;
pub use clock::{Clock, FixedClock, SystemClock};
pub use order_store::OrderStore;
pub use strategy::Strategy;

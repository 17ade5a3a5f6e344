//! Core types and traits for the scheduled trader.
//!
//! This crate provides the foundational building blocks including:
//! - Price observations and the per-symbol historical window
//! - Order requests, fills, completed orders and derived positions
//! - Trading signals and strategy configuration
//! - Core traits for strategies, brokers, order stores and clocks

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TradingError, TradingResult};
pub use types::*;
pub use traits::*;

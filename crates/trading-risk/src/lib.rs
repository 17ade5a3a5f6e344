//! Risk controls for trading.
//!
//! Converts strategy signals into concrete, equity-bounded order requests.

mod order_sizer;

pub use order_sizer::OrderSizer;

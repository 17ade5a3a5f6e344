//! Broker trait definition.

use crate::error::BrokerError;
use crate::types::{Fill, OrderRequest, PriceObservation};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for broker integrations.
///
/// Brokers provide market data, account equity, and order execution.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Get the price history for a symbol, oldest first.
    ///
    /// # Errors
    /// [`BrokerError::InvalidSymbol`] when the symbol has no data at all.
    async fn get_historical_bars(&self, symbol: &str) -> Result<Vec<PriceObservation>, BrokerError>;

    /// Get the current total account equity.
    async fn get_account_equity(&self) -> Result<Decimal, BrokerError>;

    /// Submit an order and wait for the broker to confirm what executed.
    ///
    /// # Arguments
    /// * `request` - The order request to submit
    ///
    /// # Returns
    /// The executed shares and price, which may be a partial fill
    async fn submit_order(&self, request: &OrderRequest) -> Result<Fill, BrokerError>;

    /// Get the broker name.
    fn name(&self) -> &str;
}

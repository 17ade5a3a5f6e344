//! Completed-order persistence trait.

use crate::error::StorageError;
use crate::types::{CompletedOrder, StrategyConfig};
use async_trait::async_trait;

/// Append-only store of completed orders.
///
/// Implementations own their own concurrency safety; the engine never
/// issues two writes for the same symbol at once.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All completed orders recorded for the configuration's symbol.
    async fn completed_orders(
        &self,
        config: &StrategyConfig,
    ) -> Result<Vec<CompletedOrder>, StorageError>;

    /// Append a completed order.
    async fn record_completed_order(&self, order: CompletedOrder) -> Result<(), StorageError>;
}

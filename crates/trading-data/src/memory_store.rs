//! In-memory completed-order store.

use async_trait::async_trait;
use tokio::sync::Mutex;
use trading_core::error::StorageError;
use trading_core::traits::OrderStore;
use trading_core::types::{CompletedOrder, StrategyConfig};

/// Completed orders kept in process memory. Lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<Vec<CompletedOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with previously completed orders.
    pub fn with_orders(orders: Vec<CompletedOrder>) -> Self {
        Self {
            orders: Mutex::new(orders),
        }
    }

    /// Every recorded order, in insertion order.
    pub async fn all(&self) -> Vec<CompletedOrder> {
        self.orders.lock().await.clone()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn completed_orders(
        &self,
        config: &StrategyConfig,
    ) -> Result<Vec<CompletedOrder>, StorageError> {
        let orders = self.orders.lock().await;
        Ok(orders
            .iter()
            .filter(|o| o.symbol == config.symbol())
            .cloned()
            .collect())
    }

    async fn record_completed_order(&self, order: CompletedOrder) -> Result<(), StorageError> {
        self.orders.lock().await.push(order);
        Ok(())
    }
}

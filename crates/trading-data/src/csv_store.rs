//! Append-only CSV store of completed orders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info};
use trading_core::error::StorageError;
use trading_core::traits::OrderStore;
use trading_core::types::{CompletedOrder, StrategyConfig};

/// One persisted row.
#[derive(Debug, Serialize, Deserialize)]
struct OrderRow {
    symbol: String,
    market_price: String,
    shares_bought: String,
    order_placed_time: String,
}

impl From<&CompletedOrder> for OrderRow {
    fn from(order: &CompletedOrder) -> Self {
        Self {
            symbol: order.symbol.clone(),
            market_price: order.market_price.to_string(),
            shares_bought: order.shares_bought.to_string(),
            order_placed_time: order.order_placed_time.to_rfc3339(),
        }
    }
}

impl OrderRow {
    fn into_order(self, line: usize) -> Result<CompletedOrder, StorageError> {
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            StorageError::Corrupt(format!("line {}: {}: {}", line, field, e))
        };

        Ok(CompletedOrder {
            market_price: Decimal::from_str(&self.market_price)
                .map_err(|e| corrupt("market_price", &e))?,
            shares_bought: Decimal::from_str(&self.shares_bought)
                .map_err(|e| corrupt("shares_bought", &e))?,
            order_placed_time: DateTime::parse_from_rfc3339(&self.order_placed_time)
                .map_err(|e| corrupt("order_placed_time", &e))?
                .with_timezone(&Utc),
            symbol: self.symbol,
        })
    }
}

/// Completed orders in a single CSV file.
///
/// Rows are only ever appended. Reads scan the whole file.
#[derive(Debug)]
pub struct CsvOrderStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvOrderStore {
    /// Open the store at `path`, creating the file with a header if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_path(&path)
                .map_err(|e| StorageError::Csv(e.to_string()))?;
            writer
                .write_record(["symbol", "market_price", "shares_bought", "order_placed_time"])
                .map_err(|e| StorageError::Csv(e.to_string()))?;
            writer.flush()?;
            info!(path = %path.display(), "created order store");
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every persisted order, in file order.
    pub async fn all(&self) -> Result<Vec<CompletedOrder>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_rows()
    }

    fn read_rows(&self) -> Result<Vec<CompletedOrder>, StorageError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| StorageError::Csv(e.to_string()))?;

        let mut orders = Vec::new();
        for (index, result) in reader.deserialize::<OrderRow>().enumerate() {
            // Header is line 1
            let line = index + 2;
            let row = result.map_err(|e| StorageError::Corrupt(format!("line {}: {}", line, e)))?;
            orders.push(row.into_order(line)?);
        }
        Ok(orders)
    }
}

#[async_trait]
impl OrderStore for CsvOrderStore {
    async fn completed_orders(
        &self,
        config: &StrategyConfig,
    ) -> Result<Vec<CompletedOrder>, StorageError> {
        let _guard = self.lock.lock().await;
        let orders: Vec<CompletedOrder> = self
            .read_rows()?
            .into_iter()
            .filter(|o| o.symbol == config.symbol())
            .collect();
        debug!(symbol = config.symbol(), count = orders.len(), "read completed orders");
        Ok(orders)
    }

    async fn record_completed_order(&self, order: CompletedOrder) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .serialize(OrderRow::from(&order))
            .map_err(|e| StorageError::Csv(e.to_string()))?;
        writer.flush()?;

        debug!(symbol = %order.symbol, shares = %order.shares_bought, "recorded completed order");
        Ok(())
    }
}

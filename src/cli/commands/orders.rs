//! Show completed orders for a symbol.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use trading_config::load_config;
use trading_core::types::{last_order_time, Position};
use trading_data::CsvOrderStore;
use trading_engine::{throttle_interval, throttle_wait};

use crate::cli::OrdersArgs;

pub async fn run(args: OrdersArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let path = super::store_path(&config, args.store.as_ref());
    let store = CsvOrderStore::open(&path)
        .with_context(|| format!("opening order store {}", path.display()))?;

    let symbol = args.symbol.trim().to_uppercase();
    let orders: Vec<_> = store
        .all()
        .await?
        .into_iter()
        .filter(|o| o.symbol == symbol)
        .collect();

    println!("Completed orders for {}", symbol);
    println!("═══════════════════════════════════════════════════════════");
    for order in &orders {
        println!(
            "  {}  {:>10}  @ {:>10.2}",
            order.order_placed_time.to_rfc3339(),
            order.shares_bought,
            order.market_price
        );
    }
    if orders.is_empty() {
        println!("  (none)");
    }

    let position = Position::from_orders(&symbol, &orders);
    println!();
    println!("Position:      {} shares", position.quantity);
    println!("Avg entry:     {:.2}", position.avg_entry_price);
    println!("Realized P&L:  {:.2}", position.realized_pnl);

    match last_order_time(&orders) {
        Some(last) => {
            let eligible = last + throttle_interval();
            match throttle_wait(Some(last), Utc::now()) {
                Some(wait) => println!(
                    "Next trade:    {} (in {}m)",
                    eligible.to_rfc3339(),
                    wait.num_minutes()
                ),
                None => println!("Next trade:    eligible now"),
            }
        }
        None => println!("Next trade:    eligible now"),
    }

    Ok(())
}

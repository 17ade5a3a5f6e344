//! Cycle report generation.

use chrono::{DateTime, Duration, Utc};
use trading_core::types::CompletedOrder;

use crate::TradeOutcome;

/// How one strategy's turn in the cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyResult {
    Completed(TradeOutcome),
    /// Order rejection or connection failure; the cycle moved on
    Failed(String),
}

/// One strategy's line in the cycle report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReport {
    pub symbol: String,
    pub strategy: String,
    /// Throttle wait served before trading, if any
    pub wait: Option<Duration>,
    pub result: StrategyResult,
}

/// Summary of one orchestration cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub entries: Vec<StrategyReport>,
}

impl CycleReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: StrategyReport) {
        self.entries.push(entry);
    }

    pub fn finish(&mut self, at: DateTime<Utc>) {
        self.finished_at = Some(at);
    }

    /// Orders completed during the cycle.
    pub fn trades(&self) -> impl Iterator<Item = &CompletedOrder> {
        self.entries.iter().filter_map(|e| match &e.result {
            StrategyResult::Completed(TradeOutcome::Traded(order)) => Some(order),
            _ => None,
        })
    }

    /// Number of strategies that failed without aborting the cycle.
    pub fn failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.result, StrategyResult::Failed(_)))
            .count()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                      CYCLE REPORT                         \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Started:    {}\n", self.started_at.to_rfc3339()));
        if let Some(finished) = self.finished_at {
            s.push_str(&format!("  Finished:   {}\n", finished.to_rfc3339()));
        }
        s.push_str(&format!("  Strategies: {}\n", self.entries.len()));
        s.push_str(&format!("  Trades:     {}\n", self.trades().count()));
        s.push_str(&format!("  Failures:   {}\n\n", self.failures()));

        s.push_str("STRATEGIES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for entry in &self.entries {
            let wait = entry
                .wait
                .map(|w| format!("{}s", w.num_seconds()))
                .unwrap_or_else(|| "-".to_string());
            let result = match &entry.result {
                StrategyResult::Completed(TradeOutcome::Traded(order)) => format!(
                    "traded {} @ {:.2}",
                    order.shares_bought, order.market_price
                ),
                StrategyResult::Completed(TradeOutcome::NoOrder(signal)) => {
                    format!("no order ({signal})")
                }
                StrategyResult::Completed(TradeOutcome::Unfilled(_)) => "unfilled".to_string(),
                StrategyResult::Completed(TradeOutcome::NoNewData) => "no new data".to_string(),
                StrategyResult::Failed(reason) => format!("failed: {reason}"),
            };
            s.push_str(&format!(
                "  {:<8} {:<16} wait {:<8} {}\n",
                entry.symbol, entry.strategy, wait, result
            ));
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trading_core::types::{Fill, Signal};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_counts_trades_and_failures() {
        let mut report = CycleReport::new(at(0));
        report.push(StrategyReport {
            symbol: "XYZ".into(),
            strategy: "mean_reversion".into(),
            wait: None,
            result: StrategyResult::Completed(TradeOutcome::Traded(CompletedOrder::from_fill(
                "XYZ",
                &Fill::new(dec!(111), dec!(90)),
                at(10),
            ))),
        });
        report.push(StrategyReport {
            symbol: "ABC".into(),
            strategy: "micro_trend".into(),
            wait: Some(Duration::seconds(30)),
            result: StrategyResult::Completed(TradeOutcome::NoOrder(Signal::Hold)),
        });
        report.push(StrategyReport {
            symbol: "QQQ".into(),
            strategy: "mean_reversion".into(),
            wait: None,
            result: StrategyResult::Failed("Connection error: timeout".into()),
        });
        report.finish(at(40));

        assert_eq!(report.trades().count(), 1);
        assert_eq!(report.failures(), 1);

        let summary = report.summary();
        assert!(summary.contains("traded 111 @ 90.00"));
        assert!(summary.contains("wait 30s"));
        assert!(summary.contains("failed: Connection error: timeout"));
    }
}

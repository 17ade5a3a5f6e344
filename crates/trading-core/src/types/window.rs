//! Per-symbol historical window of price observations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;

use super::PriceObservation;

/// Time-ordered buffer of observations for one symbol.
///
/// The window never evicts on its own; strategies bound what they read with
/// [`HistoricalWindow::last_n`]. Appends never reorder data already held.
#[derive(Debug, Clone, Default)]
pub struct HistoricalWindow {
    /// Symbol identifier
    symbol: String,
    /// Observations, oldest first
    observations: VecDeque<PriceObservation>,
}

impl HistoricalWindow {
    /// Create a new empty window.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            observations: VecDeque::new(),
        }
    }

    /// Symbol this window tracks.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Insert `observation` in time order.
    ///
    /// It lands after every observation with the same or an earlier
    /// timestamp, so ties keep arrival order and held data never moves
    /// relative to itself.
    pub fn append(&mut self, observation: PriceObservation) {
        let at = self
            .observations
            .partition_point(|o| o.timestamp <= observation.timestamp);
        self.observations.insert(at, observation);
    }

    /// Drop every observation.
    pub fn clear(&mut self) {
        self.observations.clear();
    }

    /// Replace the contents with `observations`, ordered by timestamp.
    ///
    /// The sort is stable, so observations sharing a timestamp keep the
    /// order they were given in.
    pub fn seed(&mut self, observations: impl IntoIterator<Item = PriceObservation>) {
        let mut seeded: Vec<PriceObservation> = observations.into_iter().collect();
        seeded.sort_by_key(|o| o.timestamp);
        self.observations = seeded.into();
    }

    /// Copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<PriceObservation> {
        self.observations.iter().cloned().collect()
    }

    /// Get the number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the newest observation.
    pub fn last(&self) -> Option<&PriceObservation> {
        self.observations.back()
    }

    /// Timestamp of the newest observation.
    pub fn newest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last().map(|o| o.timestamp)
    }

    /// Get the last N observations, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<&PriceObservation> {
        let start = self.observations.len().saturating_sub(n);
        self.observations.iter().skip(start).collect()
    }

    /// Extract closing prices, oldest first.
    pub fn closes(&self) -> Vec<Decimal> {
        self.observations.iter().map(|o| o.close).collect()
    }

    /// Get an iterator over the observations.
    pub fn iter(&self) -> impl Iterator<Item = &PriceObservation> {
        self.observations.iter()
    }
}

//! Strategy trait definition.

use crate::types::{HistoricalWindow, Signal};

/// Core strategy trait.
///
/// A strategy is a pure function of the window contents: it reads the
/// observations and returns a [`Signal`]. Implementations must return
/// [`Signal::Undetermined`] when the window is shorter than
/// [`Strategy::min_lookback`].
pub trait Strategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Evaluate the window and produce a signal.
    fn evaluate(&self, window: &HistoricalWindow) -> Signal;

    /// Minimum number of observations needed to produce a verdict.
    fn min_lookback(&self) -> usize;

    /// Check if the window is long enough to evaluate.
    fn has_enough_history(&self, observations: usize) -> bool {
        observations >= self.min_lookback()
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}

//! Error types for the scheduled trader.

use thiserror::Error;

/// Top-level trading system error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cycle cancelled before completion")]
    Cancelled,
}

impl TradingError {
    /// Whether this error must abort the whole orchestration cycle.
    ///
    /// Order rejections and connection failures only fail the strategy that
    /// hit them; everything else leaves the run in a state that cannot be
    /// trusted for the remaining symbols.
    pub fn is_fatal(&self) -> bool {
        match self {
            TradingError::Broker(err) => err.is_fatal(),
            _ => true,
        }
    }
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),
}

/// Broker-specific errors.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Invalid symbol: {0} has no market data")]
    InvalidSymbol(String),

    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Order outcome unknown: {0}")]
    OrderUnresolved(String),
}

impl BrokerError {
    /// An unknown symbol means the configuration is wrong, not the network.
    /// An accepted order whose fill cannot be confirmed leaves the throttle
    /// state untrustworthy.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BrokerError::InvalidSymbol(_)
                | BrokerError::Configuration(_)
                | BrokerError::OrderUnresolved(_)
        )
    }
}

/// Persistence errors raised by order stores.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result type alias for trading operations.
pub type TradingResult<T> = Result<T, TradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(TradingError::from(BrokerError::InvalidSymbol("XYZ".into())).is_fatal());
        assert!(!TradingError::from(BrokerError::OrderRejected("halted".into())).is_fatal());
        assert!(!TradingError::from(BrokerError::Connection("timeout".into())).is_fatal());
        assert!(TradingError::from(StorageError::Corrupt("row 3".into())).is_fatal());
        assert!(TradingError::Cancelled.is_fatal());
        assert!(TradingError::from(BrokerError::OrderUnresolved("abc".into())).is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = TradingError::from(BrokerError::InvalidSymbol("XYZ".into()));
        assert_eq!(
            err.to_string(),
            "Broker error: Invalid symbol: XYZ has no market data"
        );
    }
}

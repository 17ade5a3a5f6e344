//! Strategy registry for binding strategies to configured symbols.

use crate::{MeanReversionConfig, MeanReversionStrategy, MicroTrendConfig, MicroTrendStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trading_core::{error::StrategyError, traits::Strategy};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default parameters as JSON
    pub default_params: serde_json::Value,
}

/// Registry for available trading strategies.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();

        strategies.insert(
            "mean_reversion".to_string(),
            StrategyInfo {
                name: "mean_reversion".to_string(),
                description: MeanReversionStrategy::default().description().to_string(),
                default_params: serde_json::to_value(MeanReversionConfig::default())
                    .unwrap_or_default(),
            },
        );

        strategies.insert(
            "micro_trend".to_string(),
            StrategyInfo {
                name: "micro_trend".to_string(),
                description: MicroTrendStrategy::default().description().to_string(),
                default_params: serde_json::to_value(MicroTrendConfig::default())
                    .unwrap_or_default(),
            },
        );

        Self { strategies }
    }

    /// List all available strategies, sorted by name.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Create a strategy instance from parameters.
    ///
    /// `null` parameters select the defaults; missing fields fall back to
    /// their defaults individually.
    pub fn create(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let params = if params.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            params
        };

        match name {
            "mean_reversion" => {
                let config: MeanReversionConfig = serde_json::from_value(params)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(MeanReversionStrategy::new(config)))
            }
            "micro_trend" => {
                let config: MicroTrendConfig = serde_json::from_value(params)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Ok(Box::new(MicroTrendStrategy::new(config)))
            }
            _ => Err(StrategyError::NotFound(name.to_string())),
        }
    }

    /// Create a strategy with default parameters.
    pub fn create_default(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        self.create(name, serde_json::Value::Null)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        let names: Vec<&str> = registry.list().iter().map(|i| i.name.as_str()).collect();

        assert_eq!(names, vec!["mean_reversion", "micro_trend"]);
    }

    #[test]
    fn test_registry_get() {
        let registry = StrategyRegistry::new();

        assert!(registry.get("mean_reversion").is_some());
        assert!(registry.exists("micro_trend"));
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_create_default() {
        let registry = StrategyRegistry::new();

        let strategy = registry.create_default("mean_reversion").unwrap();
        assert_eq!(strategy.name(), "mean_reversion");
        assert_eq!(strategy.min_lookback(), 20);
    }

    #[test]
    fn test_create_with_params() {
        let registry = StrategyRegistry::new();

        let strategy = registry
            .create("micro_trend", serde_json::json!({ "lookback": 5 }))
            .unwrap();
        assert_eq!(strategy.min_lookback(), 6);

        let strategy = registry
            .create("mean_reversion", serde_json::json!({}))
            .unwrap();
        assert_eq!(strategy.min_lookback(), 20);
    }

    #[test]
    fn test_create_rejects_invalid_params() {
        let registry = StrategyRegistry::new();

        let result = registry.create("mean_reversion", serde_json::json!({ "lookback": 1 }));
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));

        let result = registry.create("mean_reversion", serde_json::json!({ "lookback": "x" }));
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_unknown_strategy() {
        let registry = StrategyRegistry::new();

        let result = registry.create_default("unknown");
        assert!(matches!(result, Err(StrategyError::NotFound(_))));
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use common::{Error, Result};

/// Top-level strategy config file (TOML).
///
/// Example `config/strategy.toml`:
/// ```toml
/// [strategy]
/// type = "sma"
/// name = "AAPL SMA 3/5"
/// symbol = "AAPL"
/// quantity = 1.0
///
/// [strategy.params]
/// short_window = 3
/// long_window = 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    pub strategy: StrategyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Strategy type identifier: "sma".
    #[serde(rename = "type")]
    pub strategy_type: String,
    /// Human-readable name shown in logs and on every trade.
    #[serde(default)]
    pub name: Option<String>,
    /// Symbol to sample prices for, e.g. "BTCUSDT".
    pub symbol: String,
    /// Units per trade.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Strategy-specific parameters.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

fn default_quantity() -> f64 {
    1.0
}

impl StrategyFileConfig {
    /// Load from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read strategy config at '{path}': {e}"))
        })?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Failed to parse strategy config at '{path}': {e}")))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if !(file.strategy.quantity.is_finite() && file.strategy.quantity > 0.0) {
            return Err(Error::Config(format!(
                "quantity must be a positive number, got {}",
                file.strategy.quantity
            )));
        }
        Ok(file)
    }
}

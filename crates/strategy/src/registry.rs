use std::collections::HashMap;

use tracing::info;

use common::{Error, Result};

use crate::config::StrategyConfig;
use crate::moving_average::MovingAverageStrategy;
use crate::Strategy;

/// Build the configured strategy, failing on unknown types or bad parameters.
pub fn build_strategy(cfg: &StrategyConfig) -> Result<Box<dyn Strategy>> {
    let strategy: Box<dyn Strategy> = match cfg.strategy_type.as_str() {
        "sma" | "moving_average" => {
            let short = param_usize(&cfg.params, "short_window", 3)?;
            let long = param_usize(&cfg.params, "long_window", 5)?;
            let mut sma = MovingAverageStrategy::new(short, long)?;
            if let Some(name) = &cfg.name {
                sma = sma.with_name(name.clone());
            }
            Box::new(sma)
        }
        other => {
            return Err(Error::Config(format!("unknown strategy type '{other}'")));
        }
    };

    info!(
        name = %strategy.name(),
        symbol = %cfg.symbol,
        history = strategy.required_history(),
        "Built strategy"
    );
    Ok(strategy)
}

fn param_usize(params: &HashMap<String, toml::Value>, key: &str, default: usize) -> Result<usize> {
    match params.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_integer()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| {
                Error::InvalidStrategy(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
    }
}

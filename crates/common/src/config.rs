use std::str::FromStr;

use crate::{Error, Result};

/// Where the trading loop gets its prices from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSourceKind {
    Binance,
    Replay,
}

impl FromStr for PriceSourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(PriceSourceKind::Binance),
            "replay" => Ok(PriceSourceKind::Replay),
            other => Err(Error::Config(format!(
                "PRICE_SOURCE must be 'binance' or 'replay', got: '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for PriceSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSourceKind::Binance => write!(f, "binance"),
            PriceSourceKind::Replay => write!(f, "replay"),
        }
    }
}

/// All configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Price source
    pub price_source: PriceSourceKind,
    /// Overrides the symbol named in the strategy file.
    pub symbol: Option<String>,
    pub replay_file: Option<String>,
    pub binance_base_url: String,

    // Paper ledger
    pub initial_balance: f64,

    // Driver
    pub iterations: u64,
    pub interval_secs: u64,

    // Strategy config file path
    pub strategy_config_path: String,
}

impl Config {
    pub const DEFAULT_BINANCE_BASE_URL: &'static str = "https://api.binance.com";

    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let price_source = match lookup("PRICE_SOURCE") {
            Some(v) => v.parse()?,
            None => PriceSourceKind::Binance,
        };

        let replay_file = lookup("REPLAY_FILE");
        if price_source == PriceSourceKind::Replay && replay_file.is_none() {
            return Err(Error::Config(
                "REPLAY_FILE is required when PRICE_SOURCE=replay".into(),
            ));
        }

        let initial_balance: f64 = parsed(&lookup, "INITIAL_BALANCE", 10_000.0)?;
        if !initial_balance.is_finite() || initial_balance < 0.0 {
            return Err(Error::Config(format!(
                "INITIAL_BALANCE must be a non-negative number, got: {initial_balance}"
            )));
        }

        let interval_secs: u64 = parsed(&lookup, "INTERVAL_SECS", 60)?;
        if interval_secs == 0 {
            return Err(Error::Config("INTERVAL_SECS must be at least 1".into()));
        }

        Ok(Config {
            price_source,
            symbol: lookup("SYMBOL").filter(|s| !s.trim().is_empty()),
            replay_file,
            binance_base_url: lookup("BINANCE_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_BINANCE_BASE_URL.to_string()),
            initial_balance,
            iterations: parsed(&lookup, "ITERATIONS", 10)?,
            interval_secs,
            strategy_config_path: lookup("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/strategy.toml".to_string()),
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{key} has invalid value '{raw}': {e}"))),
        None => Ok(default),
    }
}

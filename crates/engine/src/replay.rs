use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use common::{Error, PriceFeed, Result};

/// Plays back a scripted price sequence, one entry per request.
///
/// `None` entries stand for cycles where the provider had no data. Once the
/// script is exhausted every request returns `None`. The symbol is ignored.
pub struct ReplayFeed {
    prices: Mutex<VecDeque<Option<f64>>>,
}

impl ReplayFeed {
    pub fn new(prices: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            prices: Mutex::new(prices.into_iter().collect()),
        }
    }

    /// Script without gaps.
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        Self::new(prices.into_iter().map(Some))
    }

    /// Load a script from a text file: one price per line, blank or `-`
    /// lines are gaps, `#` starts a comment and comment-only lines are skipped.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut prices = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            let entry = line.split('#').next().unwrap_or("").trim();
            if entry.is_empty() || entry == "-" {
                prices.push(None);
                continue;
            }
            let price = entry.parse::<f64>().map_err(|e| {
                Error::Config(format!("replay line {}: '{entry}': {e}", lineno + 1))
            })?;
            prices.push(Some(price));
        }
        Ok(Self::new(prices))
    }

    pub async fn remaining(&self) -> usize {
        self.prices.lock().await.len()
    }
}

#[async_trait]
impl PriceFeed for ReplayFeed {
    async fn latest_price(&self, symbol: &str) -> Result<Option<f64>> {
        let next = self.prices.lock().await.pop_front().flatten();
        debug!(symbol, price = ?next, "Replay price");
        Ok(next)
    }
}

use async_trait::async_trait;

use crate::Result;

/// Source of the latest trade price for a symbol.
///
/// `BinancePriceFeed` implements this against the public ticker endpoint.
/// `ReplayFeed` implements this from a scripted price sequence.
///
/// `Ok(None)` means the provider had nothing for this request. Callers treat
/// it, and any `Err`, as "no data this cycle" rather than a fatal condition.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn latest_price(&self, symbol: &str) -> Result<Option<f64>>;
}

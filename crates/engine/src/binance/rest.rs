use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use common::{Error, PriceFeed, Result};

/// Binance error code for an unknown trading pair.
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Latest-price feed backed by Binance's public ticker endpoint.
/// No API key is needed.
pub struct BinancePriceFeed {
    base_url: String,
    http: Client,
}

impl BinancePriceFeed {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn ticker_url(&self, symbol: &str) -> String {
        format!("{}/api/v3/ticker/price?symbol={symbol}", self.base_url)
    }
}

#[async_trait]
impl PriceFeed for BinancePriceFeed {
    async fn latest_price(&self, symbol: &str) -> Result<Option<f64>> {
        let url = self.ticker_url(symbol);
        debug!(%url, "Requesting latest price");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        parse_ticker(status, &body)
    }
}

/// Turn a ticker response into a price.
///
/// An unknown symbol or an empty price is "no data" rather than an error.
fn parse_ticker(status: StatusCode, body: &str) -> Result<Option<f64>> {
    if !status.is_success() {
        if status == StatusCode::BAD_REQUEST {
            if let Ok(err) = serde_json::from_str::<ApiError>(body) {
                if err.code == INVALID_SYMBOL_CODE {
                    warn!(msg = %err.msg, "Binance does not know this symbol");
                    return Ok(None);
                }
            }
        }
        return Err(Error::Feed(format!("HTTP {status}: {body}")));
    }

    let ticker: PriceTicker = serde_json::from_str(body)?;
    if ticker.price.trim().is_empty() {
        return Ok(None);
    }

    ticker
        .price
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| Error::Feed(format!("unparsable price '{}': {e}", ticker.price)))
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PriceTicker {
    price: String,
}

#[derive(Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use std::str::FromStr;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, Ticker};
use crate::models::settings::DEFAULT_API_BASE_URL;
use super::traits::PriceProvider;

const PROVIDER: &str = "Bitstamp";

/// Bitstamp REST v2 provider.
///
/// - **Free**: No API key required.
/// - **Endpoints**: `/ticker/{pair}/`, `/ohlc/{pair}/?step={secs}&limit={n}`
///
/// Bitstamp encodes every number as a string; they are parsed straight
/// into `Decimal` so no precision is lost.
pub struct BitstampProvider {
    client: Client,
    base_url: String,
}

impl BitstampProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL, 30)
    }

    /// Point the provider at another base URL (e.g., a proxy or test server).
    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ticker_url(&self, pair: &str) -> String {
        format!("{}/ticker/{}/", self.base_url, pair.to_lowercase())
    }

    pub fn ohlc_url(&self, pair: &str, step_secs: u32, limit: u32) -> String {
        format!(
            "{}/ohlc/{}/?step={step_secs}&limit={limit}",
            self.base_url,
            pair.to_lowercase()
        )
    }
}

impl Default for BitstampProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Bitstamp API response types ─────────────────────────────────────

#[derive(Deserialize)]
struct TickerResponse {
    last: String,
    high: String,
    low: String,
    timestamp: String, // unix seconds
}

#[derive(Deserialize)]
struct OhlcResponse {
    data: Option<OhlcData>,
}

#[derive(Deserialize)]
struct OhlcData {
    ohlc: Option<Vec<OhlcCandle>>,
}

#[derive(Deserialize)]
struct OhlcCandle {
    timestamp: String, // unix seconds
    close: String,
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, CoreError> {
    Decimal::from_str(raw.trim()).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Invalid {field} '{raw}': {e}"),
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid timestamp '{raw}'"),
        })
}

/// Parse a `/ticker/{pair}/` response body.
pub fn parse_ticker(body: &str) -> Result<Ticker, CoreError> {
    let resp: TickerResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse ticker: {e}"),
    })?;

    Ok(Ticker {
        last: parse_decimal("last", &resp.last)?,
        high: parse_decimal("high", &resp.high)?,
        low: parse_decimal("low", &resp.low)?,
        timestamp: parse_timestamp(&resp.timestamp)?,
    })
}

/// Parse an `/ohlc/{pair}/` response body into closing prices.
///
/// A body without a `data.ohlc` block is an empty history, not an error.
/// Candles with unparsable fields are skipped. The result is sorted oldest-first.
pub fn parse_ohlc(body: &str) -> Result<Vec<PricePoint>, CoreError> {
    let resp: OhlcResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse OHLC history: {e}"),
    })?;

    let candles = match resp.data.and_then(|d| d.ohlc) {
        Some(candles) => candles,
        None => return Ok(Vec::new()),
    };

    let mut points: Vec<PricePoint> = candles
        .iter()
        .filter_map(|c| {
            Some(PricePoint {
                timestamp: parse_timestamp(&c.timestamp).ok()?,
                price: parse_decimal("close", &c.close).ok()?,
            })
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for BitstampProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_ticker(&self, pair: &str) -> Result<Ticker, CoreError> {
        let url = self.ticker_url(pair);
        debug!(%url, "fetching ticker");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_ticker(&body)
    }

    async fn get_historical_data(
        &self,
        pair: &str,
        step_secs: u32,
        limit: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let url = self.ohlc_url(pair, step_secs, limit);
        debug!(%url, "fetching OHLC history");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_ohlc(&body)
    }
}

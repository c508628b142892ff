use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, Ticker};

/// Abstraction over market data sources for the traded pair.
///
/// Bitstamp is the only built-in implementation; tests and hosts can
/// register their own (e.g., a native WebSocket bridge) through the registry.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest ticker for `pair` (e.g., "btceur").
    async fn get_ticker(&self, pair: &str) -> Result<Ticker, CoreError>;

    /// Closing prices of the last `limit` candles of `step_secs` seconds,
    /// oldest first.
    async fn get_historical_data(
        &self,
        pair: &str,
        step_secs: u32,
        limit: u32,
    ) -> Result<Vec<PricePoint>, CoreError>;
}

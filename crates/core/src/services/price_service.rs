use rust_decimal::Decimal;
use tracing::warn;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceStats, Ticker};
use crate::providers::registry::PriceProviderRegistry;

/// Fetches market data from the registered providers with fallback.
///
/// Nothing is cached here; the session facade keeps the latest ticker and
/// history in memory.
pub struct PriceService {
    registry: PriceProviderRegistry,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    /// Check if at least one provider is registered.
    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Get the names of all providers, in fallback order.
    pub fn get_provider_names(&self) -> Vec<String> {
        self.registry
            .providers()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Fetch the latest ticker for `pair`.
    ///
    /// Tries providers in registration order. A provider that fails, or
    /// returns a non-positive last price, is skipped in favor of the next.
    pub async fn get_ticker(&self, pair: &str) -> Result<Ticker, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_ticker(pair).await {
                Ok(ticker) if ticker.last > Decimal::ZERO => return Ok(ticker),
                Ok(ticker) => {
                    warn!(provider = provider.name(), last = %ticker.last, "non-positive price, trying next provider");
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid price returned for {pair}: {} (must be positive)",
                            ticker.last
                        ),
                    });
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "ticker fetch failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Fetch the historical closing prices for `pair`, oldest first.
    ///
    /// Points with non-positive prices are dropped. An empty history is a
    /// valid answer and is not retried with the next provider.
    pub async fn get_historical_data(
        &self,
        pair: &str,
        step_secs: u32,
        limit: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_historical_data(pair, step_secs, limit).await {
                Ok(mut points) => {
                    points.retain(|p| p.price > Decimal::ZERO);
                    return Ok(points);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "history fetch failed, trying next provider");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }
}

/// Compare the current price with the first point of the history window.
///
/// Returns all-`None` stats when either input is missing. The change is
/// `None` when it does not fit a `Decimal`; the percentage is also `None`
/// when the previous close is zero.
#[must_use]
pub fn price_stats(current: Option<Decimal>, history: &[PricePoint]) -> PriceStats {
    let (current, first) = match (current, history.first()) {
        (Some(current), Some(first)) => (current, first),
        _ => return PriceStats::default(),
    };

    let prev_close = first.price;
    let change = current.checked_sub(prev_close);
    let change_pct = change
        .and_then(|change| change.checked_div(prev_close))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    PriceStats {
        current_price: Some(current),
        prev_close: Some(prev_close),
        change,
        change_pct,
    }
}

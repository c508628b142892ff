use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

use super::portfolio::DEFAULT_INITIAL_BALANCE;

pub const DEFAULT_API_BASE_URL: &str = "https://www.bitstamp.net/api/v2";

/// Session configuration. Lives only in memory; the host app may build it
/// from JSON with [`Settings::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fiat balance a new portfolio starts with.
    pub initial_balance: Decimal,

    /// Fiat currency code amounts are formatted in (e.g., "EUR").
    /// See [`crate::CoinsTracker::format_fiat`].
    pub display_currency: String,

    /// Exchange pair in the provider's notation (e.g., "btceur").
    pub pair: String,

    /// Width of one historical candle, in seconds.
    pub history_step_secs: u32,

    /// Number of historical candles to request.
    pub history_limit: u32,

    /// Base URL of the Bitstamp REST API.
    pub api_base_url: String,

    /// HTTP timeout for price requests (native targets only).
    pub request_timeout_secs: u64,

    /// How often the host should refresh the price and history, in seconds.
    /// The library schedules nothing itself; see [`Settings::refresh_interval`].
    pub refresh_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            display_currency: "EUR".to_string(),
            pair: "btceur".to_string(),
            // 48 × 30 minutes = the last 24 hours
            history_step_secs: 1800,
            history_limit: 48,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            refresh_interval_secs: 10,
        }
    }
}

impl Settings {
    /// Polling period for `refresh_price` / `refresh_history`.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Parse settings from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings describe a usable session.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.initial_balance < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Initial balance must not be negative (got {})",
                self.initial_balance
            )));
        }
        let code = self.display_currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{}': must be exactly 3 ASCII letters (e.g., EUR, USD)",
                self.display_currency
            )));
        }
        if self.pair.is_empty() || !self.pair.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid trading pair '{}'",
                self.pair
            )));
        }
        if self.history_step_secs == 0 || self.history_limit == 0 {
            return Err(CoreError::ValidationError(
                "History step and limit must be positive".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "Request timeout must be positive".into(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::ValidationError(
                "Refresh interval must be positive".into(),
            ));
        }
        Ok(())
    }
}

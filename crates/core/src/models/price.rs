use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market snapshot for the trading pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Last traded price
    pub last: Decimal,
    /// 24h high
    pub high: Decimal,
    /// 24h low
    pub low: Decimal,
    /// When the exchange produced this snapshot
    pub timestamp: DateTime<Utc>,
}

/// A single point of the historical series (closing price of one interval).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// Change of the current price against the start of the historical window.
///
/// Every field is `None` until both a current price and a non-empty
/// history are known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub current_price: Option<Decimal>,

    /// First (oldest) close in the historical window
    pub prev_close: Option<Decimal>,

    /// `current − prev_close`
    pub change: Option<Decimal>,

    /// `change / prev_close × 100`
    pub change_pct: Option<Decimal>,
}

impl PriceStats {
    /// True when the change is known and not negative.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.change.is_some_and(|c| c >= Decimal::ZERO)
    }
}

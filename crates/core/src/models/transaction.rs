use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    /// Fiat → BTC
    Buy,
    /// BTC → fiat
    Sell,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::Buy => write!(f, "Buy"),
            TradeType::Sell => write!(f, "Sell"),
        }
    }
}

/// An executed trade.
///
/// Created exactly once by the ledger when a trade is accepted and never
/// modified afterwards. The price is the one the trade executed at, not
/// the market price at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Buy or Sell
    #[serde(rename = "type")]
    pub trade_type: TradeType,

    /// BTC quantity (always positive)
    pub amount: Decimal,

    /// Fiat price per BTC at execution (always positive)
    pub price: Decimal,

    /// Execution instant
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(trade_type: TradeType, amount: Decimal, price: Decimal) -> Self {
        Self::with_timestamp(trade_type, amount, price, Utc::now())
    }

    /// Create a transaction with an explicit execution instant.
    pub fn with_timestamp(
        trade_type: TradeType,
        amount: Decimal,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trade_type,
            amount,
            price,
            timestamp,
        }
    }

    /// Fiat value of the trade (`amount × price`), saturating at the decimal range.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.amount.saturating_mul(self.price)
    }

    /// Value with the sign it contributes to net invested capital:
    /// positive for buys, negative for sells.
    #[must_use]
    pub fn signed_value(&self) -> Decimal {
        match self.trade_type {
            TradeType::Buy => self.value(),
            TradeType::Sell => -self.value(),
        }
    }
}

use thiserror::Error;

/// Unified error type for the fallible (non-ledger) surface of coins-core.
///
/// The ledger itself never returns this: a rejected trade is expressed as
/// an unchanged state, or as a [`RejectReason`] via `try_execute_trade`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No price provider registered")]
    NoProvider,

    #[error("Price not available for {pair}")]
    PriceNotAvailable { pair: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Trade rejected: {0}")]
    TradeRejected(#[from] RejectReason),
}

/// Why a trade intent was refused.
///
/// The `Display` strings are the messages shown in the trade modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    #[error("Price must be greater than 0")]
    NonPositivePrice,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Insufficient BTC")]
    InsufficientHoldings,

    #[error("Trade value is out of range")]
    Overflow,

    #[error("Amount and price have too many decimal places")]
    Precision,

    #[error("Please enter a valid number")]
    InvalidNumber,
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<rust_decimal::Error> for CoreError {
    fn from(e: rust_decimal::Error) -> Self {
        CoreError::Deserialization(format!("Invalid decimal: {e}"))
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; keep the query string out of logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

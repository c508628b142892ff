use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::RejectReason;

use super::portfolio::PortfolioState;
use super::transaction::TradeType;

/// A requested buy or sell, as captured by the trade modal.
///
/// Nothing about an intent is validated on construction; the ledger
/// decides whether it can be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeIntent {
    #[serde(rename = "type")]
    pub trade_type: TradeType,

    /// BTC quantity
    pub amount: Decimal,

    /// Fiat price per BTC
    pub price: Decimal,
}

impl TradeIntent {
    pub fn new(trade_type: TradeType, amount: Decimal, price: Decimal) -> Self {
        Self {
            trade_type,
            amount,
            price,
        }
    }

    pub fn buy(amount: Decimal, price: Decimal) -> Self {
        Self::new(TradeType::Buy, amount, price)
    }

    pub fn sell(amount: Decimal, price: Decimal) -> Self {
        Self::new(TradeType::Sell, amount, price)
    }
}

/// The two state transitions the ledger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum LedgerAction {
    ExecuteTrade(TradeIntent),
    /// Recompute profit/loss at the given market price.
    UpdateProfitLoss(Decimal),
}

/// Result of submitting a trade intent to the ledger.
///
/// Both variants carry the state to continue with; a rejected trade
/// hands back the input state untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeOutcome {
    Accepted(PortfolioState),
    Rejected {
        state: PortfolioState,
        reason: RejectReason,
    },
}

impl TradeOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, TradeOutcome::Accepted(_))
    }

    #[must_use]
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            TradeOutcome::Accepted(_) => None,
            TradeOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }

    #[must_use]
    pub fn state(&self) -> &PortfolioState {
        match self {
            TradeOutcome::Accepted(state) | TradeOutcome::Rejected { state, .. } => state,
        }
    }

    /// Drop the outcome tag and keep the resulting state.
    #[must_use]
    pub fn into_state(self) -> PortfolioState {
        match self {
            TradeOutcome::Accepted(state) | TradeOutcome::Rejected { state, .. } => state,
        }
    }

    /// `Ok(state)` if accepted, `Err(reason)` otherwise (the state is dropped).
    pub fn into_result(self) -> Result<PortfolioState, RejectReason> {
        match self {
            TradeOutcome::Accepted(state) => Ok(state),
            TradeOutcome::Rejected { reason, .. } => Err(reason),
        }
    }
}

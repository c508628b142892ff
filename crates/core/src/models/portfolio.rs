use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Fiat balance every new session starts with.
pub const DEFAULT_INITIAL_BALANCE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// The simulated portfolio for one session.
///
/// Only the ledger produces new values of this type. It lives in memory
/// for the lifetime of the session and is never written to disk.
///
/// `transactions` is stored oldest-first, in execution order. Use
/// [`PortfolioState::transactions_newest_first`] for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioState {
    /// Fiat cash available, never negative
    pub balance: Decimal,

    /// BTC held, never negative
    pub btc_amount: Decimal,

    /// Executed trades, append-only
    pub transactions: Vec<Transaction>,

    /// Last computed `btc_amount × market price − net invested`
    pub profit_loss: Decimal,
}

impl PortfolioState {
    /// A fresh portfolio: `initial_balance` in cash, nothing else.
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            balance: initial_balance,
            btc_amount: Decimal::ZERO,
            transactions: Vec::new(),
            profit_loss: Decimal::ZERO,
        }
    }

    /// Transactions with the most recent first.
    #[must_use]
    pub fn transactions_newest_first(&self) -> Vec<&Transaction> {
        self.transactions.iter().rev().collect()
    }

    /// The most recently executed transaction, if any.
    #[must_use]
    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.transactions.last()
    }
}

impl Default for PortfolioState {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_BALANCE)
    }
}

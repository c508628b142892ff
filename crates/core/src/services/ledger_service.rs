use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::RejectReason;
use crate::models::portfolio::PortfolioState;
use crate::models::trade::{LedgerAction, TradeIntent, TradeOutcome};
use crate::models::transaction::{TradeType, Transaction};

/// Largest scale a `Decimal` can carry.
const MAX_SCALE: u32 = 28;

/// Applies trades and profit/loss updates to a [`PortfolioState`].
///
/// Pure business logic with no I/O and no shared state. Every operation takes
/// the current state by value and returns the next one; a rejected trade
/// returns its input unchanged.
///
/// Transactions are appended, so `state.transactions` is oldest-first.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Apply a trade, or return `state` unchanged if it cannot be applied.
    pub fn execute_trade(&self, state: PortfolioState, intent: TradeIntent) -> PortfolioState {
        self.try_execute_trade(state, intent).into_state()
    }

    /// Apply a trade and report why it was rejected, if it was.
    pub fn try_execute_trade(&self, state: PortfolioState, intent: TradeIntent) -> TradeOutcome {
        self.try_execute_trade_at(state, intent, Utc::now())
    }

    /// Same as [`LedgerService::try_execute_trade`] with an explicit clock reading.
    ///
    /// The recorded timestamp never goes backwards: if `now` is earlier than
    /// the last recorded transaction, the last transaction's instant is used.
    pub fn try_execute_trade_at(
        &self,
        mut state: PortfolioState,
        intent: TradeIntent,
        now: DateTime<Utc>,
    ) -> TradeOutcome {
        let total = match self.check_trade(&state, &intent) {
            Ok(total) => total,
            Err(reason) => {
                warn!(
                    trade_type = %intent.trade_type,
                    amount = %intent.amount,
                    price = %intent.price,
                    %reason,
                    "trade rejected"
                );
                return TradeOutcome::Rejected { state, reason };
            }
        };

        // check_trade already proved these are exact and none goes negative
        match intent.trade_type {
            TradeType::Buy => {
                state.balance -= total;
                state.btc_amount += intent.amount;
            }
            TradeType::Sell => {
                state.balance += total;
                state.btc_amount -= intent.amount;
            }
        }

        let timestamp = state
            .last_transaction()
            .map_or(now, |last| last.timestamp.max(now));
        let transaction =
            Transaction::with_timestamp(intent.trade_type, intent.amount, intent.price, timestamp);

        debug!(
            id = %transaction.id,
            trade_type = %intent.trade_type,
            amount = %intent.amount,
            price = %intent.price,
            balance = %state.balance,
            btc_amount = %state.btc_amount,
            "trade executed"
        );

        state.transactions.push(transaction);
        TradeOutcome::Accepted(state)
    }

    /// Decide whether `intent` can be applied to `state`.
    ///
    /// Returns the fiat value of the trade (`amount × price`) on success.
    ///
    /// Rules:
    /// - amount and price must be strictly positive
    /// - their product and the resulting balance and holdings must be
    ///   representable without rounding
    /// - a buy may spend at most the whole balance
    /// - a sell may dispose of at most the whole BTC holding
    pub fn check_trade(
        &self,
        state: &PortfolioState,
        intent: &TradeIntent,
    ) -> Result<Decimal, RejectReason> {
        if intent.amount <= Decimal::ZERO {
            return Err(RejectReason::NonPositiveAmount);
        }
        if intent.price <= Decimal::ZERO {
            return Err(RejectReason::NonPositivePrice);
        }

        // amount × price must be exact
        let scale = intent.amount.normalize().scale() + intent.price.normalize().scale();
        if scale > MAX_SCALE {
            return Err(RejectReason::Precision);
        }

        let total = intent
            .amount
            .checked_mul(intent.price)
            .ok_or(RejectReason::Overflow)?;
        if total.is_zero() {
            return Err(RejectReason::Precision);
        }

        match intent.trade_type {
            TradeType::Buy => {
                if total > state.balance {
                    return Err(RejectReason::InsufficientBalance);
                }
                exact_sub(state.balance, total)?;
                exact_add(state.btc_amount, intent.amount)?;
            }
            TradeType::Sell => {
                if intent.amount > state.btc_amount {
                    return Err(RejectReason::InsufficientHoldings);
                }
                exact_add(state.balance, total)?;
                exact_sub(state.btc_amount, intent.amount)?;
            }
        }

        Ok(total)
    }

    /// Recompute `profit_loss = btc_amount × current_price − net_invested`.
    ///
    /// Never rejects. A zero or negative price is used as given.
    pub fn update_profit_loss(
        &self,
        mut state: PortfolioState,
        current_price: Decimal,
    ) -> PortfolioState {
        let invested = net_invested(&state.transactions);
        state.profit_loss = state
            .btc_amount
            .saturating_mul(current_price)
            .saturating_sub(invested);
        state
    }

    /// Dispatch a [`LedgerAction`] to the matching operation.
    pub fn reduce(&self, state: PortfolioState, action: LedgerAction) -> PortfolioState {
        match action {
            LedgerAction::ExecuteTrade(intent) => self.execute_trade(state, intent),
            LedgerAction::UpdateProfitLoss(price) => self.update_profit_loss(state, price),
        }
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

/// `a + b`, refused if it overflows or would have to be rounded.
fn exact_add(a: Decimal, b: Decimal) -> Result<Decimal, RejectReason> {
    let sum = a.checked_add(b).ok_or(RejectReason::Overflow)?;
    if sum.checked_sub(a) != Some(b) {
        return Err(RejectReason::Precision);
    }
    Ok(sum)
}

/// `a − b`, refused if it overflows or would have to be rounded.
fn exact_sub(a: Decimal, b: Decimal) -> Result<Decimal, RejectReason> {
    let diff = a.checked_sub(b).ok_or(RejectReason::Overflow)?;
    if a.checked_sub(diff) != Some(b) {
        return Err(RejectReason::Precision);
    }
    Ok(diff)
}

/// Σ buy value − Σ sell value, each at its own trade price.
#[must_use]
pub fn net_invested(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.signed_value()))
}

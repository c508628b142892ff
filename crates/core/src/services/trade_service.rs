use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::{CoreError, RejectReason};
use crate::format::{round_display, to_fixed, BTC_DECIMALS, FIAT_DECIMALS};
use crate::models::portfolio::PortfolioState;
use crate::models::trade::{TradeIntent, TradeOutcome};
use crate::models::transaction::TradeType;
use crate::services::ledger_service::LedgerService;

pub const INVALID_NUMBER_MESSAGE: &str = "Please enter a valid number";

/// Trade-modal logic: input validation, fiat ↔ BTC quoting and
/// pre-trade checks with user-facing messages.
///
/// Final authority stays with the ledger; everything here only decides
/// what to show before a trade is submitted.
pub struct TradeService {
    ledger: LedgerService,
}

impl TradeService {
    pub fn new() -> Self {
        Self {
            ledger: LedgerService::new(),
        }
    }

    /// Check a BTC amount against the portfolio at `price`.
    pub fn validate_trade(
        &self,
        state: &PortfolioState,
        trade_type: TradeType,
        amount: Decimal,
        price: Decimal,
    ) -> Result<(), RejectReason> {
        self.ledger
            .check_trade(state, &TradeIntent::new(trade_type, amount, price))
            .map(|_| ())
    }

    /// Validate the form and submit its BTC amount to the ledger.
    ///
    /// On success the form is cleared. On failure the form's error is set
    /// and the state comes back unchanged.
    pub fn submit(
        &self,
        form: &mut TradeForm,
        state: PortfolioState,
        trade_type: TradeType,
        price: Decimal,
    ) -> TradeOutcome {
        let amount = match parse_amount(&form.btc_input) {
            Ok(amount) => amount,
            Err(_) => {
                let reason = RejectReason::InvalidNumber;
                form.error = Some(reason.to_string());
                return TradeOutcome::Rejected { state, reason };
            }
        };

        let outcome = self
            .ledger
            .try_execute_trade(state, TradeIntent::new(trade_type, amount, price));
        match outcome.reject_reason() {
            Some(reason) => form.error = Some(reason.to_string()),
            None => form.clear(),
        }
        outcome
    }
}

impl Default for TradeService {
    fn default() -> Self {
        Self::new()
    }
}

/// The two linked inputs of the trade modal.
///
/// Editing one side recomputes the other at the current price. Invalid
/// keystrokes are refused and leave an error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeForm {
    fiat_input: String,
    btc_input: String,
    error: Option<String>,
}

impl TradeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fiat_input(&self) -> &str {
        &self.fiat_input
    }

    pub fn btc_input(&self) -> &str {
        &self.btc_input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The user typed into the fiat field.
    pub fn set_fiat_input(&mut self, value: &str, price: Decimal) {
        self.error = None;
        let Ok(fiat) = parse_amount(value) else {
            self.error = Some(RejectReason::InvalidNumber.to_string());
            return;
        };
        self.fiat_input = value.to_string();
        self.btc_input = fiat_to_btc(fiat, price)
            .map(|btc| to_fixed(btc, BTC_DECIMALS))
            .unwrap_or_default();
    }

    /// The user typed into the BTC field.
    pub fn set_btc_input(&mut self, value: &str, price: Decimal) {
        self.error = None;
        let Ok(btc) = parse_amount(value) else {
            self.error = Some(RejectReason::InvalidNumber.to_string());
            return;
        };
        self.btc_input = value.to_string();
        self.fiat_input = btc_to_fiat(btc, price)
            .map(|fiat| to_fixed(fiat, FIAT_DECIMALS))
            .unwrap_or_default();
    }

    /// Reset both inputs and the error (modal closed or trade done).
    pub fn clear(&mut self) {
        self.fiat_input.clear();
        self.btc_input.clear();
        self.error = None;
    }
}

/// Whether `value` is acceptable as partial numeric input.
///
/// Digits with at most one `.`; a leading `0` may not be followed by
/// another digit. The empty string is accepted (cleared field).
#[must_use]
pub fn validate_numeric_input(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }
    if value.matches('.').count() > 1 {
        return false;
    }
    let mut chars = value.chars();
    !matches!((chars.next(), chars.next()), (Some('0'), Some(d)) if d.is_ascii_digit())
}

/// Parse partial numeric input. Empty and lone-`.` input parse as zero.
pub fn parse_amount(value: &str) -> Result<Decimal, CoreError> {
    if !validate_numeric_input(value) {
        return Err(CoreError::ValidationError(INVALID_NUMBER_MESSAGE.into()));
    }
    let trimmed = value.trim_end_matches('.');
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let normalized = if trimmed.starts_with('.') {
        format!("0{trimmed}")
    } else {
        trimmed.to_string()
    };
    Ok(Decimal::from_str(&normalized)?)
}

/// BTC obtainable for `fiat` at `price`, rounded to 8 places.
/// `None` for a zero amount or a non-positive price.
#[must_use]
pub fn fiat_to_btc(fiat: Decimal, price: Decimal) -> Option<Decimal> {
    if fiat.is_zero() || price <= Decimal::ZERO {
        return None;
    }
    fiat.checked_div(price)
        .map(|btc| round_display(btc, BTC_DECIMALS))
}

/// Fiat value of `btc` at `price`, rounded to 2 places. `None` for a zero amount.
#[must_use]
pub fn btc_to_fiat(btc: Decimal, price: Decimal) -> Option<Decimal> {
    if btc.is_zero() {
        return None;
    }
    btc.checked_mul(price)
        .map(|fiat| round_display(fiat, FIAT_DECIMALS))
}

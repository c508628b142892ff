//! Display formatting for amounts shown by the app.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::transaction::{TradeType, Transaction};

/// Fraction digits shown for BTC quantities.
pub const BTC_DECIMALS: u32 = 8;

/// Maximum fraction digits shown for fiat amounts.
pub const FIAT_DECIMALS: u32 = 2;

/// Round half away from zero, the way the UI rounds every displayed number.
pub(crate) fn round_display(value: Decimal, dp: u32) -> Decimal {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    // never show "-0"
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// `value` rounded to exactly `dp` fraction digits, with a `.` separator.
pub fn to_fixed(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, round_display(value, dp))
}

/// Format an amount with a decimal comma and the currency code appended.
///
/// BTC always shows eight fraction digits; any other currency shows up to
/// two, without trailing zeros. No thousands grouping.
///
/// ```
/// use coins_core::format::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456, 2), "EUR"), "1234,56 EUR");
/// assert_eq!(format_currency(Decimal::new(5, 1), "BTC"), "0,50000000 BTC");
/// ```
#[must_use]
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let number = if currency == "BTC" {
        to_fixed(amount, BTC_DECIMALS)
    } else {
        round_display(amount, FIAT_DECIMALS).normalize().to_string()
    };
    format!("{} {currency}", number.replace('.', ","))
}

/// Format a price with two fraction digits and `,` thousands grouping.
/// A `.00` fraction is dropped. Suffixed with ` €`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let fixed = to_fixed(amount, FIAT_DECIMALS);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let grouped = group_thousands(int_part);
    if frac_part == "00" {
        format!("{sign}{grouped} €")
    } else {
        format!("{sign}{grouped}.{frac_part} €")
    }
}

/// One line of the transaction list: `+0.5000 BTC / +12500 €`.
/// Buys are positive, sells negative.
#[must_use]
pub fn format_transaction_line(transaction: &Transaction) -> String {
    let sign = match transaction.trade_type {
        TradeType::Buy => '+',
        TradeType::Sell => '-',
    };
    format!(
        "{sign}{} BTC / {sign}{} €",
        to_fixed(transaction.amount, 4),
        transaction.value().normalize()
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

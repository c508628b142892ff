// ═══════════════════════════════════════════════════════════════════
// Format Tests — currency, price and transaction-line rendering
// ═══════════════════════════════════════════════════════════════════

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use coins_core::format::{format_currency, format_price, format_transaction_line, to_fixed};
use coins_core::models::transaction::{TradeType, Transaction};

mod fixed {
    use super::*;

    #[test]
    fn pads_to_requested_digits() {
        assert_eq!(to_fixed(dec!(1.5), 2), "1.50");
        assert_eq!(to_fixed(dec!(0.5), 8), "0.50000000");
        assert_eq!(to_fixed(dec!(42), 0), "42");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(to_fixed(dec!(1.005), 2), "1.01");
        assert_eq!(to_fixed(dec!(-1.005), 2), "-1.01");
        assert_eq!(to_fixed(dec!(0.123456785), 8), "0.12345679");
    }

    #[test]
    fn no_negative_zero() {
        assert_eq!(to_fixed(dec!(-0.001), 2), "0.00");
    }
}

mod currency {
    use super::*;

    #[test]
    fn fiat_uses_decimal_comma_without_grouping() {
        assert_eq!(format_currency(dec!(10000), "EUR"), "10000 EUR");
        assert_eq!(format_currency(dec!(1234.567), "EUR"), "1234,57 EUR");
    }

    #[test]
    fn fiat_drops_trailing_zeros() {
        assert_eq!(format_currency(dec!(0.50), "EUR"), "0,5 EUR");
        assert_eq!(format_currency(dec!(12.00), "USD"), "12 USD");
    }

    #[test]
    fn negative_fiat() {
        assert_eq!(format_currency(dec!(-1000), "EUR"), "-1000 EUR");
        assert_eq!(format_currency(dec!(-0.001), "EUR"), "0 EUR");
    }

    #[test]
    fn btc_always_has_eight_digits() {
        assert_eq!(format_currency(Decimal::ZERO, "BTC"), "0,00000000 BTC");
        assert_eq!(format_currency(dec!(1.123456789), "BTC"), "1,12345679 BTC");
    }
}

mod price {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_price(dec!(35123.45)), "35,123.45 €");
        assert_eq!(format_price(dec!(1234567.8)), "1,234,567.80 €");
    }

    #[test]
    fn whole_amounts_drop_fraction() {
        assert_eq!(format_price(dec!(35000)), "35,000 €");
        assert_eq!(format_price(dec!(999.999)), "1,000 €");
        assert_eq!(format_price(Decimal::ZERO), "0 €");
    }

    #[test]
    fn small_and_negative() {
        assert_eq!(format_price(dec!(999.5)), "999.50 €");
        assert_eq!(format_price(dec!(-1234.5)), "-1,234.50 €");
    }
}

mod transaction_line {
    use super::*;

    #[test]
    fn buy_is_positive() {
        let tx = Transaction::new(TradeType::Buy, dec!(0.5), dec!(25000));
        assert_eq!(format_transaction_line(&tx), "+0.5000 BTC / +12500 €");
    }

    #[test]
    fn sell_is_negative() {
        let tx = Transaction::new(TradeType::Sell, dec!(1), dec!(5000));
        assert_eq!(format_transaction_line(&tx), "-1.0000 BTC / -5000 €");
    }

    #[test]
    fn keeps_fractional_value() {
        let tx = Transaction::new(TradeType::Buy, dec!(0.1), dec!(333.33));
        assert_eq!(format_transaction_line(&tx), "+0.1000 BTC / +33.333 €");
    }
}

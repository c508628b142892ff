// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry, Bitstamp URL building and payload parsing
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use coins_core::errors::CoreError;
use coins_core::models::price::{PricePoint, Ticker};
use coins_core::models::settings::Settings;
use coins_core::providers::bitstamp::{parse_ohlc, parse_ticker, BitstampProvider};
use coins_core::providers::registry::PriceProviderRegistry;
use coins_core::providers::traits::PriceProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

struct MockProvider {
    name: String,
}

impl MockProvider {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_ticker(&self, _pair: &str) -> Result<Ticker, CoreError> {
        Ok(Ticker {
            last: dec!(100),
            high: dec!(110),
            low: dec!(90),
            timestamp: Utc::now(),
        })
    }

    async fn get_historical_data(
        &self,
        _pair: &str,
        _step_secs: u32,
        _limit: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(vec![])
    }
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn empty_registry() {
        let registry = PriceProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.primary().is_none());
    }

    #[test]
    fn defaults_register_bitstamp() {
        let registry = PriceProviderRegistry::new_with_defaults();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.primary().map(|p| p.name()), Some("Bitstamp"));
    }

    #[test]
    fn registration_order_is_fallback_order() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("first")));
        registry.register(Box::new(MockProvider::new("second")));

        let names: Vec<&str> = registry.providers().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(registry.primary().map(|p| p.name()), Some("first"));
    }

    #[test]
    fn from_settings_registers_bitstamp() {
        let settings = Settings {
            api_base_url: "http://localhost:9999/api/v2".into(),
            ..Default::default()
        };
        let registry = PriceProviderRegistry::from_settings(&settings);
        assert_eq!(registry.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Bitstamp — URLs
// ═══════════════════════════════════════════════════════════════════

mod bitstamp_urls {
    use super::*;

    #[test]
    fn default_base_url() {
        let p = BitstampProvider::new();
        assert_eq!(p.base_url(), "https://www.bitstamp.net/api/v2");
        assert_eq!(p.name(), "Bitstamp");
    }

    #[test]
    fn ticker_url() {
        let p = BitstampProvider::new();
        assert_eq!(
            p.ticker_url("btceur"),
            "https://www.bitstamp.net/api/v2/ticker/btceur/"
        );
    }

    #[test]
    fn ohlc_url() {
        let p = BitstampProvider::new();
        assert_eq!(
            p.ohlc_url("btceur", 1800, 48),
            "https://www.bitstamp.net/api/v2/ohlc/btceur/?step=1800&limit=48"
        );
    }

    #[test]
    fn pair_is_lowercased() {
        let p = BitstampProvider::new();
        assert!(p.ticker_url("BTCEUR").ends_with("/ticker/btceur/"));
    }

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let p = BitstampProvider::with_base_url("http://localhost:8080/api/", 5);
        assert_eq!(p.base_url(), "http://localhost:8080/api");
        assert_eq!(p.ticker_url("btcusd"), "http://localhost:8080/api/ticker/btcusd/");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Bitstamp — payload parsing
// ═══════════════════════════════════════════════════════════════════

mod bitstamp_parsing {
    use super::*;

    const TICKER: &str = r#"{
        "timestamp": "1700000000",
        "open": "34000",
        "high": "35500.5",
        "low": "33000",
        "last": "35123.45",
        "volume": "1234.5678",
        "vwap": "34800",
        "bid": "35120",
        "ask": "35125",
        "open_24": "34100",
        "percent_change_24": "3.00"
    }"#;

    #[test]
    fn ticker_fields() {
        let t = parse_ticker(TICKER).unwrap();
        assert_eq!(t.last, dec!(35123.45));
        assert_eq!(t.high, dec!(35500.5));
        assert_eq!(t.low, dec!(33000));
        assert_eq!(t.timestamp, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn ticker_with_bad_price_is_api_error() {
        let body = r#"{"timestamp":"1700000000","high":"1","low":"1","last":"abc"}"#;
        let err = parse_ticker(body).unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "Bitstamp");
                assert!(message.contains("last"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ticker_with_bad_timestamp_is_api_error() {
        let body = r#"{"timestamp":"yesterday","high":"1","low":"1","last":"1"}"#;
        assert!(matches!(parse_ticker(body), Err(CoreError::Api { .. })));
    }

    #[test]
    fn ticker_missing_field_is_api_error() {
        let body = r#"{"timestamp":"1700000000","high":"1","low":"1"}"#;
        assert!(matches!(parse_ticker(body), Err(CoreError::Api { .. })));
    }

    #[test]
    fn ohlc_uses_close_prices() {
        let body = r#"{"data":{"pair":"BTC/EUR","ohlc":[
            {"timestamp":"1700000000","open":"1","high":"1","low":"1","close":"35000.10","volume":"1"},
            {"timestamp":"1700001800","open":"1","high":"1","low":"1","close":"35100","volume":"1"}
        ]}}"#;
        let points = parse_ohlc(body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].price, dec!(35000.10));
        assert_eq!(points[1].price, dec!(35100));
        assert_eq!(points[1].timestamp, Utc.timestamp_opt(1_700_001_800, 0).unwrap());
    }

    #[test]
    fn ohlc_is_sorted_oldest_first() {
        let body = r#"{"data":{"ohlc":[
            {"timestamp":"1700003600","close":"3"},
            {"timestamp":"1700000000","close":"1"},
            {"timestamp":"1700001800","close":"2"}
        ]}}"#;
        let prices: Vec<_> = parse_ohlc(body).unwrap().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![dec!(1), dec!(2), dec!(3)]);
    }

    #[test]
    fn ohlc_skips_unparsable_candles() {
        let body = r#"{"data":{"ohlc":[
            {"timestamp":"1700000000","close":"n/a"},
            {"timestamp":"x","close":"1"},
            {"timestamp":"1700001800","close":"2"}
        ]}}"#;
        let points = parse_ohlc(body).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].price, dec!(2));
    }

    #[test]
    fn ohlc_without_data_is_empty() {
        assert!(parse_ohlc("{}").unwrap().is_empty());
        assert!(parse_ohlc(r#"{"data":{}}"#).unwrap().is_empty());
        assert!(parse_ohlc(r#"{"data":{"ohlc":[]}}"#).unwrap().is_empty());
    }

    #[test]
    fn ohlc_invalid_json_is_api_error() {
        assert!(matches!(parse_ohlc("<html>"), Err(CoreError::Api { .. })));
    }
}

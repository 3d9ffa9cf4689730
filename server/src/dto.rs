//! Request and response bodies.

use std::collections::BTreeMap;

use cbrates_common::{Country, Currency, Rate};
use cbrates_fx::ExchangeRateRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /get_exchange_rates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetRatesRequest {
    #[serde(default)]
    pub country: Option<Country>,
}

/// Today's table, keyed by currency code.
#[derive(Debug, Clone, Serialize)]
pub struct GetRatesResponse {
    pub rates: BTreeMap<Currency, Rate>,
}

/// Body of `POST /convert`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub country: Option<Country>,
    pub source_currency: Currency,
    pub target_currency: Currency,
    pub amount: u32,
}

impl ConvertRequest {
    /// Resolve against `default_cb` when no bank was named.
    pub fn into_exchange_rate_request(self, default_cb: &Country) -> ExchangeRateRequest {
        let country = self
            .country
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_cb.clone());

        ExchangeRateRequest::new(
            country,
            self.source_currency,
            self.target_currency,
            self.amount,
        )
    }
}

/// Converted amount, rounded to four places.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_request_falls_back_to_default_cb() {
        let request: ConvertRequest = serde_json::from_value(json!({
            "source_currency": "thb",
            "target_currency": "USD",
            "amount": 100
        }))
        .unwrap();

        let resolved = request.into_exchange_rate_request(&Country::thailand());

        assert_eq!(resolved.country, Some(Country::thailand()));
        assert_eq!(resolved.base_currency, Currency::thb());
        assert_eq!(resolved.amount, 100);
    }

    #[test]
    fn test_convert_request_keeps_named_bank() {
        let request: ConvertRequest = serde_json::from_value(json!({
            "country": "Russia",
            "source_currency": "RUR",
            "target_currency": "USD",
            "amount": 1
        }))
        .unwrap();

        let resolved = request.into_exchange_rate_request(&Country::thailand());
        assert_eq!(resolved.country, Some(Country::russia()));
    }

    #[test]
    fn test_convert_request_rejects_amount_outside_nominal_range() {
        for amount in [json!(-5), json!(u64::from(u32::MAX) + 1), json!(null)] {
            let result = serde_json::from_value::<ConvertRequest>(json!({
                "source_currency": "THB",
                "target_currency": "USD",
                "amount": amount
            }));
            assert!(result.is_err(), "accepted amount {amount}");
        }

        let missing = serde_json::from_value::<ConvertRequest>(json!({
            "source_currency": "THB",
            "target_currency": "USD"
        }));
        assert!(missing.is_err());
    }

    #[test]
    fn test_convert_response_is_a_json_number() {
        let body = serde_json::to_value(ConvertResponse {
            amount: Decimal::new(29412, 4),
        })
        .unwrap();

        let amount = body["amount"].as_f64().unwrap();
        assert!((amount - 2.9412).abs() < 1e-9);
    }
}

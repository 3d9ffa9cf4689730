//! Cross-rate conversion over a single bank's table.

use cbrates_common::{Currency, Rate, RateTable};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{FxError, FxResult};

/// Fractional digits kept in a converted amount.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Round to [`RATE_DECIMAL_PLACES`], halves away from zero.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// How much `target` do `amount` units of `base` buy, per `table`.
///
/// Both quotes are priced in the bank's own base currency, so the cross rate is
/// `(target.nominal / target.rate) * (base.rate / base.nominal) * amount`.
/// The result is a [`Rate`] with `nominal = amount` and the rounded amount of
/// `target` in `rate_target_to_base`.
pub fn convert(
    table: &RateTable,
    base: &Currency,
    target: &Currency,
    amount: u32,
) -> FxResult<Rate> {
    let target_rate = table
        .get(target)
        .ok_or_else(|| FxError::UnknownCurrency(target.clone()))?;
    let base_rate = table
        .get(base)
        .ok_or_else(|| FxError::UnknownCurrency(base.clone()))?;

    let target_per_base = Decimal::from(target_rate.nominal)
        .checked_div(target_rate.rate_target_to_base)
        .ok_or_else(|| FxError::DegenerateRate(target.clone()))?;
    let base_unit_price = base_rate
        .rate_target_to_base
        .checked_div(Decimal::from(base_rate.nominal))
        .ok_or_else(|| FxError::DegenerateRate(base.clone()))?;

    let raw = target_per_base
        .checked_mul(base_unit_price)
        .and_then(|cross| cross.checked_mul(Decimal::from(amount)))
        .ok_or_else(|| FxError::DegenerateRate(target.clone()))?;

    Ok(Rate::new(amount, base.clone(), target.clone(), round_rate(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbrates_common::Country;
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn thai_table(quotes: Vec<Rate>) -> RateTable {
        RateTable::new(
            Country::thailand(),
            Currency::thb(),
            chrono_tz::Asia::Bangkok,
            Utc::now(),
            quotes,
        )
    }

    fn usd_jpy_table() -> RateTable {
        thai_table(vec![
            Rate::new(1, Currency::thb(), Currency::usd(), dec!(34.0)),
            Rate::new(100, Currency::thb(), Currency::new("JPY"), dec!(25.1596)),
        ])
    }

    #[test]
    fn test_base_to_foreign() {
        let rate = convert(&usd_jpy_table(), &Currency::thb(), &Currency::usd(), 100).unwrap();

        assert_eq!(rate.rate_target_to_base, dec!(2.9412));
        assert_eq!(rate.nominal, 100);
        assert_eq!(rate.base_currency, Currency::thb());
        assert_eq!(rate.target_currency, Currency::usd());
    }

    #[test]
    fn test_foreign_to_base() {
        let rate = convert(&usd_jpy_table(), &Currency::usd(), &Currency::thb(), 3).unwrap();
        assert_eq!(rate.rate_target_to_base, dec!(102.0));
    }

    #[test]
    fn test_cross_rate_triangulates_through_base() {
        // 1 USD = 34 THB; 100 JPY = 25.1596 THB => 1 USD = 135.1373... JPY
        let rate = convert(&usd_jpy_table(), &Currency::usd(), &Currency::new("JPY"), 1).unwrap();
        assert_eq!(rate.rate_target_to_base, dec!(135.1373));
    }

    #[test]
    fn test_unknown_target_is_reported_first() {
        let err = convert(
            &usd_jpy_table(),
            &Currency::new("AAA"),
            &Currency::new("BBB"),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, FxError::UnknownCurrency(c) if c.code() == "BBB"));
    }

    #[test]
    fn test_unknown_base() {
        let err = convert(&usd_jpy_table(), &Currency::new("EUR"), &Currency::usd(), 1).unwrap_err();
        assert!(matches!(err, FxError::UnknownCurrency(c) if c.code() == "EUR"));
    }

    #[test]
    fn test_zero_quote_is_rejected() {
        let table = thai_table(vec![Rate::new(1, Currency::thb(), Currency::usd(), Decimal::ZERO)]);
        let err = convert(&table, &Currency::thb(), &Currency::usd(), 1).unwrap_err();
        assert!(matches!(err, FxError::DegenerateRate(c) if c == Currency::usd()));
    }

    #[test]
    fn test_zero_amount() {
        let rate = convert(&usd_jpy_table(), &Currency::thb(), &Currency::usd(), 0).unwrap();
        assert!(rate.rate_target_to_base.is_zero());
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round_rate(dec!(1.23445)), dec!(1.2345));
        assert_eq!(round_rate(dec!(-1.23445)), dec!(-1.2345));
        assert_eq!(round_rate(dec!(1.23444999)), dec!(1.2344));
        assert_eq!(round_rate(dec!(2)), dec!(2));
    }

    proptest! {
        #[test]
        fn prop_same_currency_returns_amount(
            nominal in 1u32..10_000,
            mantissa in 1i64..100_000_000,
            amount in 0u32..1_000_000,
        ) {
            let quote = Decimal::new(mantissa, 4);
            let table = thai_table(vec![Rate::new(nominal, Currency::thb(), Currency::usd(), quote)]);

            let rate = convert(&table, &Currency::usd(), &Currency::usd(), amount).unwrap();
            prop_assert_eq!(rate.rate_target_to_base, Decimal::from(amount));
        }

        #[test]
        fn prop_result_has_at_most_four_places(
            usd in 1i64..100_000_000,
            jpy in 1i64..100_000_000,
            amount in 0u32..1_000_000,
        ) {
            let table = thai_table(vec![
                Rate::new(1, Currency::thb(), Currency::usd(), Decimal::new(usd, 4)),
                Rate::new(100, Currency::thb(), Currency::new("JPY"), Decimal::new(jpy, 4)),
            ]);

            let rate = convert(&table, &Currency::usd(), &Currency::new("JPY"), amount).unwrap();
            prop_assert!(rate.rate_target_to_base.scale() <= RATE_DECIMAL_PLACES);
        }
    }
}

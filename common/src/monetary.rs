//! Rate and rate-table types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use chrono_tz::Tz;

use crate::identifiers::Country;
use crate::time::{local_date, Timestamp};

/// Currency code as published by a bank (`USD`, `THB`, `RUR`, ...).
///
/// Codes are stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn thb() -> Self {
        Self::new("THB")
    }

    /// Russian rouble, under the code the Bank of Russia feed uses.
    pub fn rur() -> Self {
        Self::new("RUR")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

/// A single quote: `nominal` units of `target_currency` cost
/// `rate_target_to_base` units of `base_currency`.
///
/// E.g. `25.1596 THB = 100 JPY` is `Rate { nominal: 100, base: THB, target: JPY, rate: 25.1596 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Amount of target currency the quote is expressed per.
    pub nominal: u32,
    pub base_currency: Currency,
    pub target_currency: Currency,
    /// Price of `nominal` target units in base units.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_target_to_base: Decimal,
}

impl Rate {
    /// Create a new rate.
    pub fn new(
        nominal: u32,
        base_currency: Currency,
        target_currency: Currency,
        rate_target_to_base: Decimal,
    ) -> Self {
        Self {
            nominal,
            base_currency,
            target_currency,
            rate_target_to_base,
        }
    }

    /// The trivial 1:1 quote of a bank's base currency against itself.
    pub fn self_rate(base: Currency) -> Self {
        Self::new(1, base.clone(), base, Decimal::ONE)
    }
}

/// One bank's daily snapshot of quotes.
///
/// Built once per fetch and never mutated afterwards; the cache replaces it
/// wholesale on the next successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    /// Bank the snapshot belongs to.
    pub country: Country,
    /// Bank-local calendar date (`YYYY-MM-DD`) the snapshot represents.
    pub date_loaded: String,
    /// Bank timezone, used for both stamping and staleness.
    pub timezone: Tz,
    /// Quotes keyed by target currency code.
    pub rates: BTreeMap<Currency, Rate>,
}

impl RateTable {
    /// Build a table from parsed quotes.
    ///
    /// `date_loaded` is `now` in the bank's timezone, and the base-currency
    /// self-rate is always present (it overrides any feed entry for the base code).
    pub fn new(
        country: Country,
        base: Currency,
        timezone: Tz,
        now: Timestamp,
        quotes: impl IntoIterator<Item = Rate>,
    ) -> Self {
        let mut rates: BTreeMap<Currency, Rate> = quotes
            .into_iter()
            .map(|rate| (rate.target_currency.clone(), rate))
            .collect();
        rates.insert(base.clone(), Rate::self_rate(base));

        Self {
            country,
            date_loaded: local_date(now, timezone),
            timezone,
            rates,
        }
    }

    /// Look up the quote for a currency.
    pub fn get(&self, currency: &Currency) -> Option<&Rate> {
        self.rates.get(currency)
    }

    /// Whether the table holds no quotes at all.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Whether the bank-local date at `now` no longer matches `date_loaded`.
    pub fn is_stale_at(&self, now: Timestamp) -> bool {
        if self.date_loaded.is_empty() {
            return true;
        }
        local_date(now, self.timezone) != self.date_loaded
    }
}

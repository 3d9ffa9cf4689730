//! Repository facade combining the cache and conversion.

use std::sync::Arc;

use cbrates_common::{Country, Currency, Rate, RateTable};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::cache::SharedRateCache;
use crate::conversion::convert;
use crate::error::{FxError, FxResult};

/// How much `target_currency` do `amount` units of `base_currency` buy at
/// `country`'s central bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateRequest {
    pub country: Option<Country>,
    pub base_currency: Currency,
    pub target_currency: Currency,
    pub amount: u32,
}

impl ExchangeRateRequest {
    /// Create a request against a specific bank.
    pub fn new(
        country: Country,
        base_currency: Currency,
        target_currency: Currency,
        amount: u32,
    ) -> Self {
        Self {
            country: Some(country),
            base_currency,
            target_currency,
            amount,
        }
    }
}

/// Public entry point for rate lookups and conversions.
pub struct RatesRepository {
    cache: SharedRateCache,
}

impl RatesRepository {
    /// Create a repository over an existing cache.
    pub fn new(cache: SharedRateCache) -> Self {
        Self { cache }
    }

    /// Today's rate table for `country`.
    #[instrument(skip(self))]
    pub async fn get_rates(&self, country: Option<&Country>) -> FxResult<Arc<RateTable>> {
        let country = require_country(country)?;
        self.cache.get(country).await
    }

    /// Convert `request.amount` of the base currency into the target currency.
    #[instrument(skip(self), fields(
        country = ?request.country,
        base = %request.base_currency,
        target = %request.target_currency,
        amount = request.amount
    ))]
    pub async fn get_exchange_rate(&self, request: &ExchangeRateRequest) -> FxResult<Rate> {
        let country = require_country(request.country.as_ref())?;

        let table = self
            .get_rates(Some(country))
            .await
            .map_err(|e| e.context("GetExchangeRate", country))?;

        let rate = convert(
            &table,
            &request.base_currency,
            &request.target_currency,
            request.amount,
        )
        .map_err(|e| e.context("GetExchangeRate", country))?;

        info!(result = %rate.rate_target_to_base, "Conversion completed");
        Ok(rate)
    }
}

fn require_country(country: Option<&Country>) -> FxResult<&Country> {
    country
        .filter(|c| !c.is_empty())
        .ok_or(FxError::NilRequest("country"))
}

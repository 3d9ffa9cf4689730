//! Per-bank rate table cache with daily staleness.
//!
//! Each registered bank owns one slot guarded by its own async read/write
//! lock. A reload holds the write side for the whole fetch, so callers that
//! queue behind it find a fresh table when they get the lock and never fetch
//! a second time. Unrelated banks never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;

use cbrates_common::{Clock, Country, RateTable, SystemClock};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{FxError, FxResult};
use crate::provider::FeedGateway;

/// One bank's gateway and its current table.
struct BankSlot {
    gateway: Arc<dyn FeedGateway>,
    table: RwLock<Option<Arc<RateTable>>>,
}

/// Thread-safe cache holding at most one table per bank.
pub struct RateCache {
    slots: HashMap<Country, BankSlot>,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    /// Create a cache over the given gateways using wall-clock time.
    pub fn new(gateways: Vec<Arc<dyn FeedGateway>>) -> Self {
        Self::with_clock(gateways, Arc::new(SystemClock))
    }

    /// Create a cache with a custom clock.
    ///
    /// A later gateway for the same country replaces an earlier one.
    pub fn with_clock(gateways: Vec<Arc<dyn FeedGateway>>, clock: Arc<dyn Clock>) -> Self {
        let slots = gateways
            .into_iter()
            .map(|gateway| {
                let country = gateway.country().clone();
                let slot = BankSlot {
                    gateway,
                    table: RwLock::new(None),
                };
                (country, slot)
            })
            .collect();

        Self { slots, clock }
    }

    /// Banks with a registered gateway, sorted.
    pub fn countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = self.slots.keys().cloned().collect();
        countries.sort();
        countries
    }

    /// Whether `table` must be refetched: absent, undated, or from an earlier
    /// bank-local day.
    pub fn is_stale(&self, table: Option<&RateTable>) -> bool {
        match table {
            None => true,
            Some(table) => table.is_stale_at(self.clock.now()),
        }
    }

    /// Get today's table for `country`, fetching it if needed.
    #[instrument(skip(self), fields(country = %country))]
    pub async fn get(&self, country: &Country) -> FxResult<Arc<RateTable>> {
        let slot = self
            .slots
            .get(country)
            .ok_or_else(|| FxError::UnsupportedCountry(country.clone()))?;

        {
            let cached = slot.table.read().await;
            if let Some(table) = cached.as_ref() {
                if !self.is_stale(Some(table.as_ref())) {
                    debug!(date_loaded = %table.date_loaded, "Cache hit");
                    return Ok(Arc::clone(table));
                }
            }
        }

        debug!("Cache miss");
        self.reload(country, slot).await?;

        let cached = slot.table.read().await;
        cached
            .clone()
            .ok_or_else(|| FxError::UnsupportedCountry(country.clone()))
    }

    /// Cached table for `country`, fresh or not, without fetching.
    pub async fn peek(&self, country: &Country) -> Option<Arc<RateTable>> {
        let slot = self.slots.get(country)?;
        slot.table.read().await.clone()
    }

    async fn reload(&self, country: &Country, slot: &BankSlot) -> FxResult<()> {
        let mut cached = slot.table.write().await;

        if !self.is_stale(cached.as_deref()) {
            debug!("Table refreshed while waiting for lock");
            return Ok(());
        }

        let fetched = slot.gateway.fetch().await.map_err(|source| {
            warn!(error = %source, "Feed fetch failed");
            FxError::UpstreamFetchFailed {
                country: country.clone(),
                source,
            }
        })?;

        let table = match fetched {
            Some(table) if !table.is_empty() => table,
            _ => {
                warn!("Feed returned no rates");
                return Err(FxError::EmptyUpstreamResult(country.clone()));
            }
        };

        info!(
            date_loaded = %table.date_loaded,
            currencies = table.rates.len(),
            "Rate table reloaded"
        );
        *cached = Some(Arc::new(table));

        Ok(())
    }
}

/// Shared rate cache.
pub type SharedRateCache = Arc<RateCache>;

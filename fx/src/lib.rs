//! CBRates FX Engine
//!
//! Daily central-bank rate tables and cross-currency conversion.
//!
//! # Features
//!
//! - One cached table per bank, fresh for one calendar day in the bank's timezone
//! - At most one upstream fetch per bank under concurrent load
//! - Triangulated cross rates rounded to four decimal places
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cbrates_common::{Country, Currency};
//! use cbrates_fx::{ExchangeRateRequest, RateCache, RatesRepository};
//!
//! let cache = Arc::new(RateCache::new(vec![russia_gateway, thailand_gateway]));
//! let repository = RatesRepository::new(cache);
//!
//! let table = repository.get_rates(Some(&Country::thailand())).await?;
//! let rate = repository
//!     .get_exchange_rate(&ExchangeRateRequest::new(
//!         Country::thailand(),
//!         Currency::thb(),
//!         Currency::usd(),
//!         100,
//!     ))
//!     .await?;
//! ```

pub mod cache;
pub mod conversion;
pub mod engine;
pub mod error;
pub mod provider;

pub use cache::{RateCache, SharedRateCache};
pub use conversion::{convert, round_rate, RATE_DECIMAL_PLACES};
pub use engine::{ExchangeRateRequest, RatesRepository};
pub use error::{FeedError, FxError, FxResult};
pub use provider::FeedGateway;

#[cfg(any(test, feature = "test-utils"))]
pub use provider::{MockFeedGateway, MockResponse};

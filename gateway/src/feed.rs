//! HTTP feed gateway, generic over the bank's document format.

use std::sync::Arc;

use async_trait::async_trait;
use cbrates_common::{Clock, Country, Currency, Rate, RateTable, SystemClock};
use cbrates_fx::{FeedError, FeedGateway};
use reqwest::header::HeaderMap;
use tracing::{debug, instrument, warn};

use crate::client::FeedClient;
use crate::config::FeedConfig;

/// One bank's wire format.
pub trait FeedFormat: Send + Sync + 'static {
    /// Currency every quote in the feed is priced in.
    fn base_currency(&self) -> Currency;

    /// Extra request headers the bank expects.
    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    /// Parse a response body into quotes, without the self-rate.
    fn parse(&self, body: &[u8]) -> Result<Vec<Rate>, FeedError>;
}

/// Fetches one bank's feed over HTTP and builds its rate table.
pub struct HttpFeedGateway<F> {
    country: Country,
    format: F,
    client: FeedClient,
    config: FeedConfig,
    clock: Arc<dyn Clock>,
}

impl<F: FeedFormat> HttpFeedGateway<F> {
    /// Create a gateway stamping tables with wall-clock time.
    pub fn new(country: Country, format: F, client: FeedClient, config: FeedConfig) -> Self {
        Self {
            country,
            format,
            client,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to stamp `date_loaded`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl<F: FeedFormat> FeedGateway for HttpFeedGateway<F> {
    fn country(&self) -> &Country {
        &self.country
    }

    #[instrument(skip(self), fields(country = %self.country, url = %self.config.api_url))]
    async fn fetch(&self) -> Result<Option<RateTable>, FeedError> {
        let body = self
            .client
            .get(&self.config.api_url, self.format.headers())
            .await?;

        let quotes = self.format.parse(&body)?;
        let timezone = self.config.resolve_timezone()?;

        if quotes.is_empty() {
            warn!("Feed contained no usable quotes");
            return Ok(None);
        }

        let table = RateTable::new(
            self.country.clone(),
            self.format.base_currency(),
            timezone,
            self.clock.now(),
            quotes,
        );

        debug!(
            date_loaded = %table.date_loaded,
            currencies = table.rates.len(),
            "Feed parsed"
        );
        Ok(Some(table))
    }
}

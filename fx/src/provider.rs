//! Feed gateway trait and a scripted implementation for tests.

use async_trait::async_trait;
use cbrates_common::{Country, RateTable};

use crate::error::FeedError;

/// Source of one central bank's daily rate table.
///
/// Implementations perform exactly one outbound request per call and stamp
/// `date_loaded` in the bank's own timezone. `Ok(None)` means the bank
/// answered without producing a table.
#[async_trait]
pub trait FeedGateway: Send + Sync {
    /// Bank this gateway serves.
    fn country(&self) -> &Country;

    /// Fetch and parse today's table.
    async fn fetch(&self) -> Result<Option<RateTable>, FeedError>;
}

/// What the mock answers with.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
pub enum MockResponse {
    Table(RateTable),
    Empty,
    Fail(String),
}

/// Scripted gateway that counts its fetches.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockFeedGateway {
    country: Country,
    response: parking_lot::Mutex<MockResponse>,
    delay: std::time::Duration,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockFeedGateway {
    /// Create a mock that answers `Empty` until told otherwise.
    pub fn new(country: Country) -> Self {
        Self {
            country,
            response: parking_lot::Mutex::new(MockResponse::Empty),
            delay: std::time::Duration::ZERO,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every fetch, simulating network latency.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer with `table` from now on.
    pub fn set_table(&self, table: RateTable) {
        *self.response.lock() = MockResponse::Table(table);
    }

    /// Answer with no table and no error from now on.
    pub fn set_empty(&self) {
        *self.response.lock() = MockResponse::Empty;
    }

    /// Fail with a network error from now on.
    pub fn set_failure(&self, message: impl Into<String>) {
        *self.response.lock() = MockResponse::Fail(message.into());
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl FeedGateway for MockFeedGateway {
    fn country(&self) -> &Country {
        &self.country
    }

    async fn fetch(&self) -> Result<Option<RateTable>, FeedError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = self.response.lock().clone();
        match response {
            MockResponse::Table(table) => Ok(Some(table)),
            MockResponse::Empty => Ok(None),
            MockResponse::Fail(message) => Err(FeedError::Network(message)),
        }
    }
}

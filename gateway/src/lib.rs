//! CBRates Feed Gateways
//!
//! HTTP gateways that fetch a central bank's published daily rates and turn
//! them into a [`RateTable`](cbrates_common::RateTable):
//!
//! - [`RussiaGateway`]: Bank of Russia `XML_daily.asp`
//! - [`ThailandGateway`]: Bank of Thailand RSS feed
//!
//! Both share one [`FeedClient`] that enforces the request timeout and the
//! response body limit.

use std::sync::Arc;

use cbrates_common::Clock;
use cbrates_fx::{FeedError, FeedGateway};

pub mod client;
pub mod config;
pub mod feed;
pub mod russia;
pub mod thailand;

#[cfg(test)]
mod test_support;

pub use client::FeedClient;
pub use config::{FeedConfig, GatewayConfig, DEFAULT_TIMEOUT, MAX_BODY_BYTES};
pub use feed::{FeedFormat, HttpFeedGateway};
pub use russia::{RussiaFeed, RussiaGateway};
pub use thailand::{ThailandFeed, ThailandGateway};

/// Build a gateway for every supported bank.
pub fn build_gateways(
    config: &GatewayConfig,
    clock: Arc<dyn Clock>,
) -> Result<Vec<Arc<dyn FeedGateway>>, FeedError> {
    let client = FeedClient::from_config(config)?;

    let russia: Arc<dyn FeedGateway> = Arc::new(
        RussiaGateway::russia(client.clone(), config.russia.clone()).with_clock(clock.clone()),
    );
    let thailand: Arc<dyn FeedGateway> =
        Arc::new(ThailandGateway::thailand(client, config.thailand.clone()).with_clock(clock));

    Ok(vec![russia, thailand])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbrates_common::{Country, SystemClock};

    #[test]
    fn test_build_gateways() {
        let gateways = build_gateways(&GatewayConfig::default(), Arc::new(SystemClock)).unwrap();

        let countries: Vec<&Country> = gateways.iter().map(|g| g.country()).collect();
        assert_eq!(countries, vec![&Country::russia(), &Country::thailand()]);
    }
}

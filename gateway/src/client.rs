//! HTTP client shared by the feed gateways.

use std::time::Duration;

use cbrates_fx::FeedError;
use reqwest::header::HeaderMap;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::GatewayConfig;

/// Thin wrapper over `reqwest` enforcing the feed timeout and body limit.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    max_body_bytes: usize,
}

impl FeedClient {
    /// Create a client with the given request timeout and body limit.
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    /// Create a client from gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, FeedError> {
        Self::new(config.timeout, config.max_body_bytes)
    }

    /// GET `url` and return the body.
    ///
    /// Any status other than 2xx is an error, as is a body longer than the
    /// configured limit.
    #[instrument(skip(self, headers))]
    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Vec<u8>, FeedError> {
        let mut response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| request_error(url, e))? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(bytes = body.len(), "Feed body received");
        Ok(body)
    }

    fn too_large(&self, url: &str) -> FeedError {
        FeedError::BodyTooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        }
    }
}

fn request_error(url: &str, err: reqwest::Error) -> FeedError {
    if err.is_timeout() {
        FeedError::Timeout {
            url: url.to_string(),
        }
    } else {
        FeedError::Network(err.to_string())
    }
}

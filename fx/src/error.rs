//! Rate engine error types.

use cbrates_common::{Country, Currency};
use thiserror::Error;

/// Failures reported by a feed gateway while producing a rate table.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure (connect, TLS, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Upstream did not answer within the client timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Upstream answered with a non-success status.
    #[error("unexpected status code {status} received from {url}")]
    Status { status: u16, url: String },

    /// Response body exceeded the read limit.
    #[error("response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    /// Body could not be parsed into quotes.
    #[error("failed to parse feed: {0}")]
    Parse(String),

    /// Configured timezone does not resolve.
    #[error("bad timezone {0:?} provided in the config")]
    Timezone(String),
}

/// Errors that can occur in the rate engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// No feed gateway is registered for the bank.
    #[error("provided country {0} unsupported")]
    UnsupportedCountry(Country),

    /// The bank's feed failed.
    #[error("failed to load {country} central bank data: {source}")]
    UpstreamFetchFailed {
        country: Country,
        #[source]
        source: FeedError,
    },

    /// The feed answered successfully but yielded nothing.
    #[error("empty rates returned from central bank {0} with no error")]
    EmptyUpstreamResult(Country),

    /// Currency is not quoted in the bank's table.
    #[error("currency {0} not supported")]
    UnknownCurrency(Currency),

    /// Quote for the currency is zero or too large to convert with.
    #[error("rate for {0} cannot be used in conversion")]
    DegenerateRate(Currency),

    /// A required request field was missing.
    #[error("nil request: missing {0}")]
    NilRequest(&'static str),

    /// Failure of a repository operation, with the bank it was run for.
    #[error("{operation} failed for CB {country}: {source}")]
    Operation {
        operation: &'static str,
        country: Country,
        #[source]
        source: Box<FxError>,
    },
}

impl FxError {
    /// Wrap with the name of the failing operation and its bank.
    pub fn context(self, operation: &'static str, country: &Country) -> Self {
        FxError::Operation {
            operation,
            country: country.clone(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through `Operation` wrappers.
    pub fn root(&self) -> &FxError {
        match self {
            FxError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether calling again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root(),
            FxError::UpstreamFetchFailed { .. } | FxError::EmptyUpstreamResult(_)
        )
    }

    /// Stable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self.root() {
            FxError::UnsupportedCountry(_) => "UNSUPPORTED_COUNTRY",
            FxError::UpstreamFetchFailed { .. } => "UPSTREAM_FETCH_FAILED",
            FxError::EmptyUpstreamResult(_) => "EMPTY_UPSTREAM_RESULT",
            FxError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            FxError::DegenerateRate(_) => "DEGENERATE_RATE",
            FxError::NilRequest(_) => "NIL_REQUEST",
            FxError::Operation { .. } => "OPERATION_FAILED",
        }
    }
}

/// Result type for rate engine operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_and_root_unwraps() {
        let err = FxError::UnknownCurrency(Currency::new("XYZ"))
            .context("convert", &Country::russia())
            .context("GetExchangeRate", &Country::russia());

        assert!(matches!(err.root(), FxError::UnknownCurrency(c) if c.code() == "XYZ"));
        assert_eq!(err.error_code(), "UNKNOWN_CURRENCY");
        assert!(err.to_string().starts_with("GetExchangeRate failed for CB russia"));
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_retryable() {
        let upstream = FxError::UpstreamFetchFailed {
            country: Country::thailand(),
            source: FeedError::Status {
                status: 503,
                url: "http://localhost".to_string(),
            },
        };
        assert!(upstream.is_retryable());
        assert!(!FxError::UnsupportedCountry(Country::new("mars")).is_retryable());
    }
}

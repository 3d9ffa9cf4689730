//! Feed gateway configuration.

use std::time::Duration;

use cbrates_fx::FeedError;
use chrono_tz::Tz;

/// Upper bound on a single feed request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest response body a gateway will read.
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// Where one bank publishes its rates and which timezone its day runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Feed URL.
    pub api_url: String,
    /// IANA timezone name used to stamp `date_loaded`.
    pub timezone: String,
}

impl FeedConfig {
    /// Create a feed configuration.
    pub fn new(api_url: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timezone: timezone.into(),
        }
    }

    /// Bank of Russia daily XML feed.
    pub fn russia() -> Self {
        Self::new("https://www.cbr.ru/scripts/XML_daily.asp", "Europe/Moscow")
    }

    /// Bank of Thailand RSS feed.
    pub fn thailand() -> Self {
        Self::new("https://www.bot.or.th/App/RSS/fxrate-all.xml", "Asia/Bangkok")
    }

    /// Parse the configured timezone name.
    pub fn resolve_timezone(&self) -> Result<Tz, FeedError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| FeedError::Timezone(self.timezone.clone()))
    }

    /// Override from `<PREFIX>_API_URL` and `<PREFIX>_TIMEZONE`.
    fn apply_env(&mut self, prefix: &str) {
        if let Ok(url) = std::env::var(format!("{prefix}_API_URL")) {
            self.api_url = url;
        }

        if let Ok(timezone) = std::env::var(format!("{prefix}_TIMEZONE")) {
            self.timezone = timezone;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.is_empty() {
            return Err("Feed API URL cannot be empty".to_string());
        }

        self.resolve_timezone().map_err(|e| e.to_string())?;

        Ok(())
    }
}

/// Configuration for all feed gateways.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bank of Russia feed.
    pub russia: FeedConfig,
    /// Bank of Thailand feed.
    pub thailand: FeedConfig,
    /// Request timeout, covering connect and body read.
    pub timeout: Duration,
    /// Response body limit in bytes.
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            russia: FeedConfig::russia(),
            thailand: FeedConfig::thailand(),
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.russia.apply_env("RUSSIA_CB");
        config.thailand.apply_env("THAILAND_CB");

        if let Some(secs) = std::env::var("FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.russia
            .validate()
            .map_err(|e| format!("russia: {e}"))?;
        self.thailand
            .validate()
            .map_err(|e| format!("thailand: {e}"))?;

        if self.timeout.is_zero() {
            return Err("Feed timeout cannot be zero".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("Body limit cannot be zero".to_string());
        }

        Ok(())
    }
}

//! Server configuration.

use cbrates_common::Country;
use cbrates_gateway::GatewayConfig;

/// Largest request body the API will read.
pub const MAX_REQUEST_BODY_BYTES: usize = 1 << 20;

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Bank used by `/convert` when the request names none.
    pub default_cb: Country,
    /// Log level, used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Feed gateway configuration.
    pub gateways: GatewayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            default_cb: Country::russia(),
            log_level: "info".to_string(),
            gateways: GatewayConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            gateways: GatewayConfig::from_env(),
            ..Self::default()
        };

        if let Ok(addr) = std::env::var("SERVER_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("SERVER_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(country) = std::env::var("DEFAULT_CB") {
            config.default_cb = Country::new(country);
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// `addr:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if ![Country::russia(), Country::thailand()].contains(&self.default_cb) {
            return Err(format!("Default CB {} is not supported", self.default_cb));
        }

        self.gateways.validate()
    }
}

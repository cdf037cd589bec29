//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration for the sentinel HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Trend provider base URL
    pub provider_url: String,

    /// Maximum provider requests per minute
    pub provider_rate_limit: u32,

    /// Trend cache validity window in minutes
    pub cache_ttl_minutes: i64,

    /// Enable CORS for the API (allow-all; demo posture)
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,

    /// Optional fixed seed for the mocked chatter source
    pub chatter_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5001".parse().unwrap(),
            provider_url: "https://trends.google.com".to_string(),
            provider_rate_limit: 10,
            cache_ttl_minutes: 10,
            enable_cors: true,
            enable_request_logging: true,
            chatter_seed: None,
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache_ttl_minutes".to_string(),
                reason: "TTL must be at least one minute".to_string(),
            });
        }

        if self.provider_rate_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "provider_rate_limit".to_string(),
                reason: "Rate limit must allow at least 1 request".to_string(),
            });
        }

        if self.provider_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "provider_url".to_string(),
                reason: "Provider URL must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    bind_address: Option<SocketAddr>,
    provider_url: Option<String>,
    provider_rate_limit: Option<u32>,
    cache_ttl_minutes: Option<i64>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
    chatter_seed: Option<u64>,
}

impl ServerConfigBuilder {
    /// Set bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Set bind address from string
    pub fn bind_address_str(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.bind_address = Some(addr.parse().map_err(|_| ConfigError::InvalidValue {
            field: "bind_address".to_string(),
            reason: format!("Invalid address: {addr}"),
        })?);
        Ok(self)
    }

    /// Set provider base URL
    pub fn provider_url(mut self, url: impl Into<String>) -> Self {
        self.provider_url = Some(url.into());
        self
    }

    /// Set provider rate limit (requests per minute)
    pub fn provider_rate_limit(mut self, limit: u32) -> Self {
        self.provider_rate_limit = Some(limit);
        self
    }

    /// Set cache TTL in minutes
    pub fn cache_ttl_minutes(mut self, minutes: i64) -> Self {
        self.cache_ttl_minutes = Some(minutes);
        self
    }

    /// Enable/disable CORS
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.enable_cors = Some(enable);
        self
    }

    /// Enable/disable request logging
    pub fn enable_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = Some(enable);
        self
    }

    /// Fix the chatter seed (deterministic scores)
    pub fn chatter_seed(mut self, seed: u64) -> Self {
        self.chatter_seed = Some(seed);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            provider_url: self.provider_url.unwrap_or(defaults.provider_url),
            provider_rate_limit: self
                .provider_rate_limit
                .unwrap_or(defaults.provider_rate_limit),
            cache_ttl_minutes: self.cache_ttl_minutes.unwrap_or(defaults.cache_ttl_minutes),
            enable_cors: self.enable_cors.unwrap_or(defaults.enable_cors),
            enable_request_logging: self
                .enable_request_logging
                .unwrap_or(defaults.enable_request_logging),
            chatter_seed: self.chatter_seed,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address.port(), 5001);
        assert_eq!(config.cache_ttl_minutes, 10);
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .cache_ttl_minutes(5)
            .provider_rate_limit(3)
            .enable_cors(false)
            .build()
            .unwrap();

        assert_eq!(config.cache_ttl_minutes, 5);
        assert_eq!(config.provider_rate_limit, 3);
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = ServerConfig::builder().cache_ttl_minutes(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let result = ServerConfig::builder().provider_rate_limit(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_address() {
        let config = ServerConfig::builder()
            .bind_address_str("127.0.0.1:9000")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.bind_address.port(), 9000);
    }
}

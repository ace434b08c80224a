// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8787;
const DEFAULT_MAX_REQUEST_CONTENT_LENGTH: usize = 10 * 1024 * 1024;
const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Process configuration for the relay server.
///
/// The collector URL is deliberately absent: it is compiled in
/// (see [`crate::transport::COLLECTOR_URL`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Address the tail receiver binds to
    pub host: String,
    /// Port the tail receiver listens on
    pub port: u16,
    /// Largest tail batch body accepted, in bytes
    pub max_request_content_length: usize,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_request_content_length: DEFAULT_MAX_REQUEST_CONTENT_LENGTH,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RelayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("TAIL_RELAY_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("TAIL_RELAY_PORT") {
            Ok(port) => port.trim().parse::<u16>().map_err(|_| {
                ConfigError::InvalidConfig(format!("TAIL_RELAY_PORT is not a valid port: {port}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        let max_request_content_length = env::var("TAIL_RELAY_MAX_REQUEST_CONTENT_LENGTH")
            .ok()
            .and_then(|len| len.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_REQUEST_CONTENT_LENGTH);
        let log_level = env::var("TAIL_RELAY_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let config = Self {
            host,
            port,
            max_request_content_length,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "Receiver port must be greater than 0".to_string(),
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "TAIL_RELAY_HOST cannot be empty".to_string(),
            ));
        }

        if self.max_request_content_length == 0 {
            return Err(ConfigError::InvalidConfig(
                "Maximum request content length must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

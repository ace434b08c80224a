// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// Reasons a single log entry did not reach the collector.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The collector answered with a non-success status.
    #[error("{} {status_text}", .status.as_u16())]
    Rejected {
        status: StatusCode,
        status_text: String,
    },

    /// The request never completed (connect, DNS, TLS, timeout, body).
    #[error("{0}")]
    Transport(String),

    /// The log item was not a JSON object, so there was nothing to enrich.
    #[error("log entry is not a JSON object: {0}")]
    MalformedEntry(String),

    /// The enriched record could not be turned into a JSON body.
    #[error("unable to serialize log record: {0}")]
    Serialization(String),
}

impl DeliveryError {
    pub fn rejected(status: StatusCode) -> Self {
        DeliveryError::Rejected {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for DeliveryError {
    fn from(err: serde_json::Error) -> Self {
        DeliveryError::Serialization(err.to_string())
    }
}

/// Errors raised while reading the process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

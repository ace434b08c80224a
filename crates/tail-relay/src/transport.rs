// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::time::Instant;
use tracing::{debug, error};

use crate::error::DeliveryError;
use crate::http_utils::build_client;

/// Collector every enriched record is POSTed to.
pub const COLLECTOR_URL: &str = "https://vector-dev-tmp.fly.dev/";

#[async_trait]
pub trait LogTransport {
    /// Sends one serialized record to the collector and waits for its answer.
    /// Any 2xx status counts as delivered.
    async fn deliver(&self, body: Vec<u8>) -> Result<(), DeliveryError>;
}

/// Ships records to the collector over HTTP, one POST per record.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Transport targeting [`COLLECTOR_URL`].
    pub fn new() -> Self {
        Self::with_endpoint(COLLECTOR_URL)
    }

    /// Transport targeting an arbitrary endpoint, e.g. a local mock collector.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = build_client().unwrap_or_else(|e| {
            error!("Unable to build HTTP client: {e}, falling back to defaults");
            reqwest::Client::new()
        });
        HttpTransport {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn create_request(&self, body: Vec<u8>) -> reqwest::RequestBuilder {
        self.client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogTransport for HttpTransport {
    async fn deliver(&self, body: Vec<u8>) -> Result<(), DeliveryError> {
        let time = Instant::now();
        let response = self.create_request(body).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(
                "Log delivered in {} ms with status {status}",
                time.elapsed().as_millis()
            );
            Ok(())
        } else {
            Err(DeliveryError::rejected(status))
        }
    }
}

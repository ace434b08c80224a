// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use tracing::debug;

use crate::diagnostics::{DiagnosticSink, TracingDiagnostics};
use crate::enrich::enrich;
use crate::error::DeliveryError;
use crate::event::{LogItem, TraceEvent};
use crate::transport::{HttpTransport, LogTransport};

/// Forwards every log entry of a tail batch to the collector.
///
/// Entries are sent one at a time, in event order then log order, and each
/// request is awaited before the next entry is looked at. A failed entry is
/// reported to the diagnostic sink and skipped; nothing is retried and the
/// caller never sees an error.
#[derive(Clone)]
pub struct LogRelay {
    transport: Arc<dyn LogTransport + Send + Sync>,
    diagnostics: Arc<dyn DiagnosticSink + Send + Sync>,
}

impl LogRelay {
    pub fn new(
        transport: Arc<dyn LogTransport + Send + Sync>,
        diagnostics: Arc<dyn DiagnosticSink + Send + Sync>,
    ) -> Self {
        LogRelay {
            transport,
            diagnostics,
        }
    }

    pub async fn tail(&self, events: &[TraceEvent]) {
        self.diagnostics.batch_received(events);

        for event in events {
            let app = event.script_name();
            for item in event.logs() {
                let result = match item {
                    LogItem::Entry(entry) => match enrich(&event.script_name, entry).to_json() {
                        Ok(body) => self.transport.deliver(body).await,
                        Err(e) => Err(e.into()),
                    },
                    LogItem::Malformed(value) => {
                        Err(DeliveryError::MalformedEntry(value.to_string()))
                    }
                };

                if let Err(e) = result {
                    self.diagnostics.delivery_failed(app, &e);
                }
            }
        }

        debug!("Finished relaying batch of {} tail events", events.len());
    }
}

impl Default for LogRelay {
    /// Relay posting to the collector and logging through `tracing`.
    fn default() -> Self {
        LogRelay::new(
            Arc::new(HttpTransport::new()),
            Arc::new(TracingDiagnostics),
        )
    }
}

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::{error, info};

use crate::error::DeliveryError;
use crate::event::TraceEvent;

/// Operational output of the relay. Nothing here feeds back into processing.
pub trait DiagnosticSink {
    /// Called once per batch, before any log entry is forwarded.
    fn batch_received(&self, events: &[TraceEvent]);

    /// Called once per log entry that did not reach the collector.
    fn delivery_failed(&self, app: Option<&str>, error: &DeliveryError);
}

/// Writes diagnostics through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn batch_received(&self, events: &[TraceEvent]) {
        match serde_json::to_string(events) {
            Ok(raw) => info!("Received {} tail events: {raw}", events.len()),
            Err(_) => info!("Received {} tail events: {events:?}", events.len()),
        }
    }

    fn delivery_failed(&self, app: Option<&str>, error: &DeliveryError) {
        let app = app.unwrap_or("<unnamed>");
        match error {
            DeliveryError::Rejected { .. } => {
                error!("Failed to send log from {app}: {error}")
            }
            DeliveryError::MalformedEntry(_) => {
                error!("Skipped log from {app}: {error}")
            }
            DeliveryError::Transport(_) | DeliveryError::Serialization(_) => {
                error!("Error sending log from {app}: {error}")
            }
        }
    }
}

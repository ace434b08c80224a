// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Relays log entries carried by host-runtime tail events to a log collector.
//!
//! Each batch of [`event::TraceEvent`]s is walked in order. Every log entry is
//! enriched with the name of the script that produced it, serialized to JSON
//! and POSTed on its own to the collector. Delivery failures are reported to
//! a [`diagnostics::DiagnosticSink`] and never interrupt the rest of the batch.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod diagnostics;
pub mod enrich;
pub mod error;
pub mod event;
pub mod http_utils;
pub mod logger;
pub mod receiver;
pub mod relay;
pub mod transport;

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tail_relay::{
    config::RelayConfig,
    diagnostics::TracingDiagnostics,
    logger,
    receiver::TailReceiver,
    relay::LogRelay,
    transport::{HttpTransport, COLLECTOR_URL},
};

#[tokio::main]
pub async fn main() {
    let config = match RelayConfig::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            // No subscriber yet, so this has to go straight to stderr.
            eprintln!("Error reading tail relay configuration: {e}");
            return;
        }
    };

    let env_filter = format!(
        "h2=off,hyper=off,rustls=off,reqwest=off,{}",
        config.log_level
    );

    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Could not parse log level in configuration: {e}");
            return;
        }
    };

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .event_format(logger::Formatter)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting default subscriber failed: {e}");
        return;
    }

    debug!("Logging subsystem enabled");

    let relay = Arc::new(LogRelay::new(
        Arc::new(HttpTransport::new()),
        Arc::new(TracingDiagnostics),
    ));

    let receiver = TailReceiver {
        config: Arc::clone(&config),
        relay,
    };

    info!(
        "Starting tail relay on {}, forwarding to {COLLECTOR_URL}",
        config.bind_address()
    );

    if let Err(e) = receiver.start_receiver().await {
        error!("Error when running tail receiver: {e:?}");
    }
}

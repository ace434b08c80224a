// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP listener through which the host runtime hands over tail batches.
//!
//! A batch is the JSON array of trace events the runtime would pass to a tail
//! consumer. The response is only sent once every log entry of the batch has
//! been relayed, so the runtime sees the call complete after forwarding ends.

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper::{header, http, Method, Request, Response, StatusCode};
use serde_json::json;
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info_span, Instrument};

use crate::config::RelayConfig;
use crate::event::{count_log_entries, TraceEvent};
use crate::http_utils::{log_and_create_http_response, verify_request_content_length, HttpResponse};
use crate::relay::LogRelay;
use crate::transport::COLLECTOR_URL;

pub const TAIL_ENDPOINT_PATH: &str = "/tail";
pub const INFO_ENDPOINT_PATH: &str = "/info";

pub struct TailReceiver {
    pub config: Arc<RelayConfig>,
    pub relay: Arc<LogRelay>,
}

impl TailReceiver {
    /// Binds to the configured address and serves until the listener fails.
    pub async fn start_receiver(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let now = Instant::now();
        let listener = TcpListener::bind(self.config.bind_address()).await?;

        debug!(
            "Tail receiver started: listening on {} in {} ms",
            self.config.bind_address(),
            now.elapsed().as_millis()
        );

        self.serve(listener).await
    }

    /// Serves tail requests on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Box<dyn Error + Send + Sync>> {
        let config = self.config.clone();
        let relay = self.relay.clone();

        let service = service_fn(move |req: Request<Incoming>| {
            // called for each http request
            let config = config.clone();
            let relay = relay.clone();
            TailReceiver::endpoint_handler(config, relay, req)
        });

        let server = hyper::server::conn::http1::Builder::new();
        let mut joinset = tokio::task::JoinSet::new();

        loop {
            let conn = tokio::select! {
                con_res = listener.accept() => match con_res {
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::ConnectionAborted
                                | io::ErrorKind::ConnectionReset
                                | io::ErrorKind::ConnectionRefused
                        ) =>
                    {
                        continue;
                    }
                    Err(e) => {
                        error!("Server error: {e}");
                        return Err(e.into());
                    }
                    Ok((conn, _)) => conn,
                },
                finished = async {
                    match joinset.join_next().await {
                        Some(finished) => finished,
                        None => std::future::pending().await,
                    }
                } => match finished {
                    Err(e) if e.is_panic() => {
                        error!("Connection handler panicked: {:?}", e);
                        continue;
                    },
                    Ok(()) | Err(_) => continue,
                },
            };
            let conn = hyper_util::rt::TokioIo::new(conn);
            let server = server.clone();
            let service = service.clone();
            joinset.spawn(async move {
                if let Err(e) = server.serve_connection(conn, service).await {
                    error!("Connection error: {e}");
                }
            });
        }
    }

    pub async fn endpoint_handler<B>(
        config: Arc<RelayConfig>,
        relay: Arc<LogRelay>,
        req: Request<B>,
    ) -> http::Result<HttpResponse>
    where
        B: Body,
        B::Error: Into<Box<dyn Error + Send + Sync>>,
    {
        match (req.method(), req.uri().path()) {
            (&Method::PUT | &Method::POST, TAIL_ENDPOINT_PATH) => {
                Self::tail_handler(config, relay, req).await
            }
            (&Method::GET, INFO_ENDPOINT_PATH) => Self::info_handler(&config),
            _ => {
                let mut not_found = Response::default();
                *not_found.status_mut() = StatusCode::NOT_FOUND;
                Ok(not_found)
            }
        }
    }

    async fn tail_handler<B>(
        config: Arc<RelayConfig>,
        relay: Arc<LogRelay>,
        req: Request<B>,
    ) -> http::Result<HttpResponse>
    where
        B: Body,
        B::Error: Into<Box<dyn Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        if let Some(response) = verify_request_content_length(
            &parts.headers,
            config.max_request_content_length,
            "Error processing tail batch",
        ) {
            return response;
        }

        // Chunked bodies carry no length up front, so the limit is enforced
        // while reading too.
        let body_bytes = match Limited::new(body, config.max_request_content_length)
            .collect()
            .await
        {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                return log_and_create_http_response(
                    "Error processing tail batch: Payload too large",
                    StatusCode::PAYLOAD_TOO_LARGE,
                );
            }
            Err(e) => {
                return log_and_create_http_response(
                    &format!("Error reading tail batch body: {e}"),
                    StatusCode::BAD_REQUEST,
                );
            }
        };

        let events: Vec<TraceEvent> = match serde_json::from_slice(&body_bytes) {
            Ok(events) => events,
            Err(e) => {
                return log_and_create_http_response(
                    &format!("Error deserializing tail batch: {e}"),
                    StatusCode::BAD_REQUEST,
                );
            }
        };

        let entries = count_log_entries(&events);
        let span = info_span!("tail_batch", events = events.len(), entries);
        relay.tail(&events).instrument(span).await;

        log_and_create_http_response(
            &format!(
                "Relayed {entries} log entries from {} events",
                events.len()
            ),
            StatusCode::OK,
        )
    }

    fn info_handler(config: &RelayConfig) -> http::Result<HttpResponse> {
        let response_json = json!(
            {
                "endpoints": [
                    TAIL_ENDPOINT_PATH,
                    INFO_ENDPOINT_PATH
                ],
                "collector": COLLECTOR_URL,
                "config": {
                    "receiver_port": config.port,
                    "max_request_content_length": config.max_request_content_length
                }
            }
        );
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(response_json.to_string())))
    }
}

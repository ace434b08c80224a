// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Helper functions for integration tests

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tail_relay::{
    config::RelayConfig, diagnostics::TracingDiagnostics, receiver::TailReceiver,
    relay::LogRelay, transport::HttpTransport,
};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Starts a tail receiver on a random local port whose relay posts to `collector_url`.
pub async fn start_receiver(collector_url: &str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind tail receiver");
    let addr = listener.local_addr().expect("Failed to get local addr");

    let receiver = TailReceiver {
        config: Arc::new(RelayConfig {
            port: addr.port(),
            ..Default::default()
        }),
        relay: Arc::new(LogRelay::new(
            Arc::new(HttpTransport::with_endpoint(collector_url)),
            Arc::new(TracingDiagnostics),
        )),
    };

    tokio::spawn(async move {
        if let Err(e) = receiver.serve(listener).await {
            panic!("tail receiver stopped: {e}");
        }
    });

    addr
}

/// Send an HTTP request over TCP and return the status and body of the response
pub async fn send_tcp_request(
    addr: SocketAddr,
    uri: &str,
    method: &str,
    body: Option<Vec<u8>>,
) -> Result<(u16, String), Box<dyn std::error::Error>> {
    let stream = timeout(Duration::from_secs(2), tokio::net::TcpStream::connect(addr)).await??;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

    tokio::spawn(async move {
        let _ = conn.await;
    });

    let mut request_builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("Host", addr.to_string())
        .header("Content-Type", "application/json");

    let body_data = body.unwrap_or_default();
    request_builder = request_builder.header("Content-Length", body_data.len().to_string());
    let request = request_builder.body(Full::new(Bytes::from(body_data)))?;

    let response: Response<hyper::body::Incoming> =
        timeout(Duration::from_secs(10), sender.send_request(request)).await??;
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await?.to_bytes();

    Ok((status, String::from_utf8(bytes.to_vec())?))
}

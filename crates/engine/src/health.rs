// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The health/metrics HTTP surface: `GET /health` and `GET /metrics`,
//! fleshing out the "contracts only" collaborator named in the core spec.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::warn;

use objmirror_core::{AtomicMetricsSink, CycleMetrics};

/// Parses the CLI's `--status-addr` flag, which follows the Go-style
/// `:PORT` shorthand for "bind all interfaces" in addition to full
/// `host:port` forms.
pub fn parse_status_addr(raw: &str) -> Result<SocketAddr, std::net::AddrParseError> {
    if let Some(port) = raw.strip_prefix(':') {
        format!("0.0.0.0:{port}").parse()
    } else {
        raw.parse()
    }
}

/// Serves `/health` and `/metrics` until the listener errors. Intended to be
/// run as its own `tokio::spawn`ed task alongside the periodic loop.
pub async fn serve(
    addr: SocketAddr,
    readiness: Arc<AtomicBool>,
    metrics: Arc<AtomicMetricsSink>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let readiness = Arc::clone(&readiness);
        let metrics = Arc::clone(&metrics);
        tokio::spawn(async move {
            let service = service_fn(move |req| handle(req, Arc::clone(&readiness), Arc::clone(&metrics)));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(error = %e, "health: connection error");
            }
        });
    }
}

async fn handle(
    req: Request<Incoming>,
    readiness: Arc<AtomicBool>,
    metrics: Arc<AtomicMetricsSink>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, "/health") if readiness.load(Ordering::Acquire) => {
            Response::builder().status(200).body(Full::new(Bytes::from_static(b"GOOD")))
        }
        (&Method::GET, "/health") => {
            Response::builder().status(500).body(Full::new(Bytes::from_static(b"NOT READY")))
        }
        (&Method::GET, "/metrics") => Response::builder()
            .status(200)
            .header("content-type", "text/plain; version=0.0.4")
            .body(Full::new(Bytes::from(render_metrics(&metrics.snapshot())))),
        _ => Response::builder().status(404).body(Full::new(Bytes::new())),
    };
    #[allow(clippy::expect_used)]
    Ok(response.expect("response builder with a fixed status/body never fails"))
}

fn render_metrics(m: &CycleMetrics) -> String {
    format!(
        "# TYPE objinsync_loop_sync_time gauge\n\
         objinsync_loop_sync_time {sync_time_ms}\n\
         # TYPE objinsync_pull_files_listed gauge\n\
         objinsync_pull_files_listed {files_listed}\n\
         # TYPE objinsync_pull_files_pulled gauge\n\
         objinsync_pull_files_pulled {files_pulled}\n\
         # TYPE objinsync_pull_files_deleted gauge\n\
         objinsync_pull_files_deleted {files_deleted}\n",
        sync_time_ms = m.sync_time_ms,
        files_listed = m.files_listed,
        files_pulled = m.files_pulled,
        files_deleted = m.files_deleted,
    )
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod cli;
mod exit_error;
mod logging;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use objmirror_adapters::S3StoreConfig;
use objmirror_core::{AtomicMetricsSink, IdentityCache, MetricsSink};
use objmirror_engine::{build_store, health, loop_runner, pull, Config};

use cli::{Cli, Command, PullArgs};
use exit_error::ExitError;

fn main() {
    logging::init();

    if let Err(e) = run() {
        let exit_error = e.downcast::<ExitError>().unwrap_or_else(|e| ExitError::new(1, e.to_string()));
        eprintln!("objmirror: {}", exit_error.message);
        std::process::exit(exit_error.code);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Command::Pull(args) = cli.command;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?
        .block_on(run_pull(args))
}

async fn run_pull(args: PullArgs) -> anyhow::Result<()> {
    if std::env::var_os("SENTRY_DSN").is_some() {
        info!("crash reporting enabled (SENTRY_DSN set)");
    }

    let s3_config = S3StoreConfig {
        region: std::env::var("AWS_REGION").ok(),
        // A custom endpoint (MinIO, a local mock, another S3-compatible store)
        // is almost never reachable through virtual-hosted-style DNS, so a
        // non-default endpoint always implies path-style addressing.
        path_style: args.s3_endpoint.is_some(),
        endpoint: args.s3_endpoint.clone(),
        disable_ssl: args.disable_ssl,
    };

    let config = Config::build(
        &args.remote_uri,
        &args.local_path,
        &args.excludes,
        args.interval,
        args.status_addr.clone(),
        args.scratch,
        args.default_file_mode,
        s3_config,
    )
    .map_err(|e| ExitError::new(2, e.to_string()))?;

    let store = build_store(&config).await.map_err(|e| ExitError::new(2, e.to_string()))?;
    let identity_cache = Arc::new(IdentityCache::new());

    if !config.skip_warmup {
        match objmirror_core::warmup::populate_from_local(&identity_cache, &config.local_root, &config.matcher) {
            Ok(seeded) => info!(seeded, "identity cache warm-up complete"),
            Err(e) => warn!(error = %e, "identity cache warm-up failed, continuing with an empty cache"),
        }
    }

    if args.once {
        let metrics: Arc<dyn MetricsSink> = Arc::new(AtomicMetricsSink::new());
        let non_fatal = pull(&config, store, identity_cache, metrics.as_ref())
            .await
            .map_err(|e| ExitError::new(1, e.to_string()))?;
        if !non_fatal.is_empty() {
            return Err(ExitError::new(1, non_fatal).into());
        }
        return Ok(());
    }

    let metrics = Arc::new(AtomicMetricsSink::new());
    let readiness = Arc::new(AtomicBool::new(false));
    let status_addr = health::parse_status_addr(&config.status_addr)
        .map_err(|e| ExitError::new(2, format!("invalid --status-addr {:?}: {e}", config.status_addr)))?;

    let health_handle = tokio::spawn(health::serve(status_addr, Arc::clone(&readiness), Arc::clone(&metrics)));

    let loop_result = loop_runner::run(&config, store, identity_cache, metrics, readiness).await;
    health_handle.abort();

    loop_result.map_err(|e| ExitError::new(1, e.to_string()).into())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup: a `tracing_subscriber::fmt` subscriber filtered by
//! `RUST_LOG`, defaulting to `info` and elevated to `debug` when the `DEBUG`
//! environment variable is set.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let default_directive = if std::env::var_os("DEBUG").is_some() { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

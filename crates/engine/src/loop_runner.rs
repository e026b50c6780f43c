// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic loop: invokes the driver at a fixed interval in daemon mode.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, warn};

use objmirror_adapters::ObjectStore;
use objmirror_core::{IdentityCache, MetricsSink};

use crate::config::Config;
use crate::driver;
use crate::error::EngineError;

/// Runs one pull immediately, then one every `config.interval`, until a
/// fatal error occurs. Flips `readiness` after the first cycle completes
/// (even if it reported non-fatal errors) so the health endpoint can answer
/// `200` once the tree has been reconciled at least once.
pub async fn run(
    config: &Config,
    store: Arc<dyn ObjectStore>,
    identity_cache: Arc<IdentityCache>,
    metrics: Arc<dyn MetricsSink>,
    readiness: Arc<AtomicBool>,
) -> Result<(), EngineError> {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let outcome = driver::pull(config, Arc::clone(&store), Arc::clone(&identity_cache), metrics.as_ref()).await;
        match outcome {
            Ok(errors) if errors.is_empty() => {}
            Ok(errors) => warn!(errors, "pull cycle reported non-fatal errors"),
            Err(e) => {
                error!(error = %e, "pull cycle failed fatally, stopping daemon loop");
                return Err(e);
            }
        }
        readiness.store(true, Ordering::Release);
    }
}

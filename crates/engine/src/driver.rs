// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconciliation driver: orchestrates one pull cycle end to end.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{info, warn};

use objmirror_adapters::{ObjectStore, S3Store};
use objmirror_core::{CycleMetrics, IdentityCache, MetricsSink};

use crate::classify::Classifier;
use crate::config::{Config, ERROR_QUEUE_CAPACITY, TASK_QUEUE_CAPACITY};
use crate::error::EngineError;
use crate::{errors, inventory, workers};

/// Constructs the production `ObjectStore` for `config`'s bucket, resolving
/// region/credentials through `aws-config`'s default provider chain (which
/// already falls back to the instance-metadata service) unless a region was
/// configured explicitly.
pub async fn build_store(config: &Config) -> Result<Arc<dyn ObjectStore>, EngineError> {
    let store = S3Store::new(config.remote.bucket.clone(), &config.s3)
        .await
        .map_err(|e| match e {
            objmirror_adapters::StoreError::RegionDetection => EngineError::RegionDetection,
            other => EngineError::StoreConstruction(other),
        })?;
    Ok(Arc::new(store))
}

/// Removes the scratch directory on drop, on every exit path from [`pull`].
struct ScratchGuard(PathBuf);

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.0.display(), error = %e, "driver: failed to remove scratch dir");
            }
        }
    }
}

/// Runs one pull cycle: inventory, listing + classification, worker pool,
/// stale-file deletion, metrics. Returns the joined non-fatal error string
/// (empty means no non-fatal errors) or a fatal [`EngineError`].
pub async fn pull(
    config: &Config,
    store: Arc<dyn ObjectStore>,
    identity_cache: Arc<IdentityCache>,
    metrics: &dyn MetricsSink,
) -> Result<String, EngineError> {
    let cycle_start = Instant::now();

    // 1. Local inventory -> DeleteSet. Fatal on I/O failure.
    let mut delete_set =
        inventory::list_and_prune(&config.local_root, &config.matcher).map_err(EngineError::InventoryFailed)?;

    // 2. Remote (bucket, prefix) already parsed into config.remote.

    // 3. Bounded channels.
    let (task_tx, task_rx) = mpsc::channel(TASK_QUEUE_CAPACITY);
    let (error_tx, error_rx) = mpsc::channel(ERROR_QUEUE_CAPACITY);

    // 5. Scratch directory, removed on every exit path via ScratchGuard.
    let scratch_dir = config.scratch_dir();
    std::fs::create_dir_all(&scratch_dir).map_err(EngineError::ScratchDirCreate)?;
    let _scratch_guard = ScratchGuard(scratch_dir.clone());

    // 6. Worker pool.
    let worker_handles = workers::spawn_workers(
        config.worker_count,
        Arc::clone(&store),
        scratch_dir,
        config.file_mode,
        Arc::clone(&identity_cache),
        task_rx,
        error_tx,
    );

    // 7. Error aggregator.
    let aggregator_handle = tokio::spawn(errors::run_aggregator(error_rx));

    // 8-9. Listing drives the classifier page by page.
    let (files_listed, files_pulled, listing_result) = {
        let mut classifier =
            Classifier::new(&config.matcher, &identity_cache, &mut delete_set, &config.local_root, &config.remote, task_tx);
        let result = store.list_pages(&config.remote.prefix, &mut classifier).await;
        (classifier.files_listed(), classifier.files_pulled(), result)
        // classifier (and its task_tx) drops here, closing the task queue.
    };

    // 10-11. Wait for workers to drain the (now closed) task queue.
    for handle in worker_handles {
        let _ = handle.await;
    }

    // 7(cont)/11. Wait for the aggregator to finish joining error messages.
    let aggregated_errors = aggregator_handle.await.unwrap_or_default();

    // 12. Listing failure is fatal; downloads already attempted are kept, but
    // stale-file deletion does not run.
    if let Err(e) = listing_result {
        return Err(EngineError::ListingFailed(e.to_string()));
    }

    let files_deleted = delete_set.len() as u64;
    let sync_time_ms = cycle_start.elapsed().as_millis() as u64;

    // 13. Metrics.
    metrics.record_cycle(CycleMetrics { files_listed, files_pulled, files_deleted, sync_time_ms });
    info!(files_listed, files_pulled, files_deleted, sync_time_ms, "pull cycle complete");

    // 14. Delete stale local files. Best-effort.
    for path in delete_set.into_iter() {
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "driver: failed to remove stale file");
            }
        }
    }

    Ok(aggregated_errors)
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pool: each worker repeatedly takes a task and performs one
//! atomic single-file replacement until the task channel is closed and
//! drained.

use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tracing::{trace, warn};

use objmirror_adapters::ObjectStore;
use objmirror_core::{DownloadTask, IdentityCache, RemoteUri};

/// Spawns `count` workers draining `task_rx`, returning their join handles so
/// the caller can await completion after closing the sender side.
pub fn spawn_workers(
    count: usize,
    store: Arc<dyn ObjectStore>,
    scratch_dir: PathBuf,
    file_mode: u32,
    identity_cache: Arc<IdentityCache>,
    task_rx: mpsc::Receiver<DownloadTask>,
    error_tx: mpsc::Sender<String>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let task_rx = Arc::new(AsyncMutex::new(task_rx));
    (0..count.max(1))
        .map(|worker_id| {
            let store = Arc::clone(&store);
            let scratch_dir = scratch_dir.clone();
            let identity_cache = Arc::clone(&identity_cache);
            let task_rx = Arc::clone(&task_rx);
            let error_tx = error_tx.clone();
            tokio::spawn(async move {
                loop {
                    let task = {
                        let mut rx = task_rx.lock().await;
                        rx.recv().await
                    };
                    let Some(task) = task else {
                        break;
                    };
                    process_task(worker_id, &*store, &scratch_dir, file_mode, &identity_cache, task, &error_tx)
                        .await;
                }
            })
        })
        .collect()
}

async fn process_task(
    worker_id: usize,
    store: &dyn ObjectStore,
    scratch_dir: &std::path::Path,
    file_mode: u32,
    identity_cache: &IdentityCache,
    task: DownloadTask,
    error_tx: &mpsc::Sender<String>,
) {
    // 1. Defensive: the classifier already filters directory markers.
    if task.remote_uri.ends_with('/') {
        return;
    }

    // 2. Parse the task's own URI rather than trusting its fields blindly.
    let key = match RemoteUri::parse(&task.remote_uri) {
        Ok(uri) => uri.prefix,
        Err(e) => {
            report(error_tx, format!("{}: bad task uri {:?}: {}", worker_id, task.remote_uri, e)).await;
            return;
        }
    };

    // 3. Ensure the parent directory exists.
    if let Some(parent) = task.local_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            report(error_tx, format!("{}: create parent dir for {}: {}", worker_id, task.local_path.display(), e))
                .await;
            return;
        }
    }

    // 4. Deterministic temp filename under the scratch dir (same filesystem
    // as the local root) so two workers never collide on one destination and
    // the final rename is atomic.
    let temp_path = scratch_dir.join(temp_name(&task.local_path));

    // 5. Download. Errors here MUST abort before rename/cache update.
    let download_result = {
        let mut file = match tokio::fs::File::create(&temp_path).await {
            Ok(f) => f,
            Err(e) => {
                report(error_tx, format!("{}: create temp file {}: {}", worker_id, temp_path.display(), e)).await;
                return;
            }
        };
        store.download(&key, &mut file).await
    };
    if let Err(e) = download_result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        report(error_tx, format!("{}: download {}: {}", worker_id, key, e)).await;
        return;
    }

    // 6. Atomic rename over the destination.
    if let Err(e) = tokio::fs::rename(&temp_path, &task.local_path).await {
        report(error_tx, format!("{}: rename into {}: {}", worker_id, task.local_path.display(), e)).await;
        return;
    }
    set_file_mode(&task.local_path, file_mode).await;

    // 7. Only now, after a successful atomic rename, update the cache.
    trace!(worker_id, key = %task.key, "worker: placed file");
    identity_cache.put(task.key, task.identity);
}

fn temp_name(local_path: &std::path::Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(local_path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(unix)]
async fn set_file_mode(path: &std::path::Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await {
        warn!(path = %path.display(), error = %e, "worker: failed to set file mode");
    }
}

#[cfg(not(unix))]
async fn set_file_mode(_path: &std::path::Path, _mode: u32) {}

async fn report(error_tx: &mpsc::Sender<String>, message: String) {
    warn!(message, "worker: task failed");
    if error_tx.send(message).await.is_err() {
        // Aggregator already gone; cycle is tearing down.
    }
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;

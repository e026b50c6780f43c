// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Page classifier: turns one listing page into un-delete markers and
//! enqueued download tasks.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use objmirror_adapters::{ObjectRecord, PageSink};
use objmirror_core::{DeleteSet, DownloadTask, IdentityCache, RelativeKey, RemoteUri};

/// Drives one cycle's worth of listing pages into the task channel. Borrows
/// the cycle's `DeleteSet` for the enqueue phase only; nothing else touches
/// the set until the driver reads it back after listing completes.
pub struct Classifier<'a> {
    matcher: &'a objmirror_core::PathMatcher,
    identity_cache: &'a IdentityCache,
    delete_set: &'a mut DeleteSet,
    local_root: &'a Path,
    remote: &'a RemoteUri,
    task_tx: mpsc::Sender<DownloadTask>,
    files_listed: u64,
    files_pulled: u64,
}

impl<'a> Classifier<'a> {
    pub fn new(
        matcher: &'a objmirror_core::PathMatcher,
        identity_cache: &'a IdentityCache,
        delete_set: &'a mut DeleteSet,
        local_root: &'a Path,
        remote: &'a RemoteUri,
        task_tx: mpsc::Sender<DownloadTask>,
    ) -> Self {
        Self { matcher, identity_cache, delete_set, local_root, remote, task_tx, files_listed: 0, files_pulled: 0 }
    }

    pub fn files_listed(&self) -> u64 {
        self.files_listed
    }

    pub fn files_pulled(&self) -> u64 {
        self.files_pulled
    }

    async fn handle_record(&mut self, record: ObjectRecord) {
        // 1. Directory marker.
        if record.key.ends_with('/') {
            trace!(key = %record.key, "classify: directory marker, skip");
            return;
        }

        // 2. Relativize.
        let rel = match objmirror_core::key::relativize(&record.key, &self.remote.prefix) {
            Ok(rel) => rel,
            Err(e) => {
                warn!(key = %record.key, error = %e, "classify: key not under prefix, skip");
                return;
            }
        };

        // 3. Exclude.
        if self.matcher.is_excluded(&rel) {
            trace!(rel, "classify: excluded, skip");
            return;
        }

        // 4. Un-delete, unconditionally — the remote still claims this file
        // even if step 5/7 below decide not to download it.
        self.delete_set.remove(&self.local_root.join(&rel));

        // 5. Prefix marker itself.
        let Some(key) = RelativeKey::new(rel) else {
            trace!("classify: prefix marker, skip");
            return;
        };

        // 6. Count listed.
        self.files_listed += 1;

        // 7. Identity check.
        if let Some(cached) = self.identity_cache.get(&key) {
            if cached == record.identity {
                trace!(key = %key, "classify: unchanged, skip");
                return;
            }
        }

        // 8. Schedule. The task URI carries the object store's native key
        // (prefix included), not the relativized key used for the local path.
        self.files_pulled += 1;
        let task = DownloadTask {
            remote_uri: self.remote.object_uri(&record.key),
            local_path: self.local_root.join(key.as_str()),
            identity: record.identity,
            key,
        };
        if let Err(e) = self.task_tx.send(task).await {
            warn!(error = %e, "classify: task channel closed, dropping task");
        }
    }
}

#[async_trait]
impl PageSink for Classifier<'_> {
    async fn handle_page(&mut self, records: Vec<ObjectRecord>) {
        debug!(count = records.len(), "classify: handling page");
        for record in records {
            self.handle_record(record).await;
        }
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;

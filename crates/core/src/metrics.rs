// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-cycle counters and the injected metrics collaborator.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// `filesListed`, `filesPulled`, `filesDeleted`, plus a wall-clock
/// `syncTime` — emitted via the metrics collaborator at cycle end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleMetrics {
    pub files_listed: u64,
    pub files_pulled: u64,
    pub files_deleted: u64,
    pub sync_time_ms: u64,
}

/// Injected at construction so the default "register to a process-wide
/// registry" behavior can be swapped for a test double without a global.
pub trait MetricsSink: Send + Sync {
    fn record_cycle(&self, metrics: CycleMetrics);
}

/// Default sink: holds the last cycle's values as atomics. Each cycle
/// overwrites the previous one, matching the gauge semantics in `spec.md`.
#[derive(Default)]
pub struct AtomicMetricsSink {
    files_listed: AtomicU64,
    files_pulled: AtomicU64,
    files_deleted: AtomicU64,
    sync_time_ms: AtomicI64,
}

impl AtomicMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CycleMetrics {
        CycleMetrics {
            files_listed: self.files_listed.load(Ordering::Relaxed),
            files_pulled: self.files_pulled.load(Ordering::Relaxed),
            files_deleted: self.files_deleted.load(Ordering::Relaxed),
            sync_time_ms: self.sync_time_ms.load(Ordering::Relaxed).max(0) as u64,
        }
    }
}

impl MetricsSink for AtomicMetricsSink {
    fn record_cycle(&self, metrics: CycleMetrics) {
        self.files_listed.store(metrics.files_listed, Ordering::Relaxed);
        self.files_pulled.store(metrics.files_pulled, Ordering::Relaxed);
        self.files_deleted.store(metrics.files_deleted, Ordering::Relaxed);
        self.sync_time_ms.store(metrics.sync_time_ms as i64, Ordering::Relaxed);
    }
}

/// Discards every cycle's metrics; used in tests that don't care.
#[derive(Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record_cycle(&self, _metrics: CycleMetrics) {}
}

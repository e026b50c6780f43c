// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content identity comparison: the process-lived `RelativeKey -> ObjectIdentity` cache.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::key::RelativeKey;

/// An opaque, comparable content identity (an S3 ETag for non-multipart
/// uploads is the quoted MD5 hex of the object body). Never parsed —
/// equality is the only operation this type supports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentity(String);

impl ObjectIdentity {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Quoted MD5 hex, matching the quoting convention S3 uses for ETags of
    /// non-multipart objects. Both sides of every comparison (listing and
    /// local warm-up) must use this same convention or equality silently
    /// stops matching.
    pub fn from_md5_bytes(digest: &[u8]) -> Self {
        Self(format!("\"{}\"", hex::encode(digest)))
    }
}

impl std::fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-lived mapping from relative path to last-observed remote content
/// identity. Reads and writes are serialized by a single mutex; critical
/// sections are one map read or one map write.
///
/// Entries are inserted or overwritten only after the corresponding file has
/// been successfully and atomically placed at its local path, and are never
/// removed during a cycle. If the cache were updated before placement, a
/// crash would leave it believing a never-written file is current, and
/// every future cycle would skip the download forever.
#[derive(Default)]
pub struct IdentityCache {
    entries: Mutex<HashMap<RelativeKey, ObjectIdentity>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RelativeKey) -> Option<ObjectIdentity> {
        self.entries.lock().get(key).cloned()
    }

    pub fn put(&self, key: RelativeKey, identity: ObjectIdentity) {
        self.entries.lock().insert(key, identity);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

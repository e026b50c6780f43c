// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional identity-cache warm-up from local content on startup.
//!
//! On request, walks the local root and computes, for each non-excluded
//! file, an identity equal to the quoted hex of its MD5 digest, seeding the
//! cache under the file's relative key. This lets a restart avoid
//! re-downloading files whose local content already matches the remote. If
//! disabled (scratch mode), the first cycle downloads every remote file.
//!
//! S3 multipart uploads produce ETags that are not the MD5 of the body, so
//! this warm-up cannot recompute them; such files are always re-downloaded
//! on the first cycle after a restart. That's an accepted limitation, not a
//! bug in this routine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use tracing::warn;

use crate::exclude::PathMatcher;
use crate::identity::{IdentityCache, ObjectIdentity};
use crate::key::RelativeKey;

/// Walk `local_root`, seeding `cache` with an MD5-derived identity for every
/// non-excluded regular file. Returns the number of entries seeded.
pub fn populate_from_local(
    cache: &IdentityCache,
    local_root: &Path,
    matcher: &PathMatcher,
) -> io::Result<usize> {
    let mut seeded = 0usize;
    walk(local_root, local_root, matcher, &mut |rel_path, abs_path| {
        match hash_file(abs_path) {
            Ok(digest) => {
                if let Some(key) = RelativeKey::new(rel_path) {
                    cache.put(key, ObjectIdentity::from_md5_bytes(&digest));
                    seeded += 1;
                }
            }
            Err(e) => warn!(path = %abs_path.display(), error = %e, "warm-up: failed to hash file"),
        }
    })?;
    Ok(seeded)
}

fn walk(
    root: &Path,
    dir: &Path,
    matcher: &PathMatcher,
    visit_file: &mut impl FnMut(String, &Path),
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        let rel = to_forward_slash(root, &path);

        if file_type.is_dir() {
            if matcher.is_excluded(&format!("{rel}/")) {
                continue;
            }
            walk(root, &path, matcher, visit_file)?;
        } else if file_type.is_file() {
            if matcher.is_excluded(&rel) {
                continue;
            }
            visit_file(rel, &path);
        }
    }
    Ok(())
}

fn to_forward_slash(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn hash_file(path: &Path) -> io::Result<[u8; 16]> {
    let bytes = fs::read(path)?;
    let mut hasher = Md5::new();
    hasher.update(&bytes);
    let out = hasher.finalize();
    let mut arr = [0u8; 16];
    arr.copy_from_slice(&out);
    Ok(arr)
}

#[cfg(test)]
#[path = "warmup_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local inventory walk: builds the per-cycle [`DeleteSet`] and prunes
//! directories left empty by excluded or since-deleted files.

use std::fs;
use std::path::{Path, PathBuf};

use objmirror_core::{DeleteSet, PathMatcher};

/// Walks `local_root`, honoring `matcher`, and returns the set of regular
/// files (absolute paths) that are candidates for deletion this cycle.
///
/// Directories matched by an exclude pattern are not descended into at all:
/// their files never enter the delete set and the directory itself is never
/// considered for pruning. Any other directory that ends up with no
/// surviving children (files or non-pruned subdirectories) is removed,
/// except `local_root` itself.
pub fn list_and_prune(local_root: &Path, matcher: &PathMatcher) -> std::io::Result<DeleteSet> {
    let mut delete_set = DeleteSet::new();
    walk(local_root, local_root, matcher, &mut delete_set)?;
    Ok(delete_set)
}

/// Returns whether `dir` ended up with no surviving entries (and is
/// therefore a pruning candidate for its caller).
fn walk(
    dir: &Path,
    root: &Path,
    matcher: &PathMatcher,
    delete_set: &mut DeleteSet,
) -> std::io::Result<bool> {
    let mut has_survivors = false;

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        let file_type = fs::symlink_metadata(&path)?.file_type();
        let rel = relative_slash_path(&path, root);

        if file_type.is_dir() {
            let rel_as_dir = format!("{rel}/");
            if matcher.is_excluded(&rel_as_dir) {
                continue;
            }
            let child_empty = walk(&path, root, matcher, delete_set)?;
            if child_empty {
                let _ = fs::remove_dir(&path);
            } else {
                has_survivors = true;
            }
        } else if file_type.is_file() {
            has_survivors = true;
            if matcher.is_excluded(&rel) {
                continue;
            }
            delete_set.insert(path);
        }
    }

    Ok(!has_survivors)
}

fn relative_slash_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;

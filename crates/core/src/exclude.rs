// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Doublestar-style exclude matching against relative paths.
//!
//! `*` matches any run of non-separator characters, `**` matches zero or
//! more path segments including separators, `?` matches a single
//! non-separator character, and `[class]` matches a character class.
//! Patterns are anchored to the start of the relative path — there is no
//! implicit leading `**/`.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::CoreError;

pub struct PathMatcher {
    set: GlobSet,
}

impl PathMatcher {
    pub fn new<I, S>(patterns: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            // literal_separator: true so a single `*` never crosses a `/`,
            // matching the doublestar semantics (`**` is the only thing that does).
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| CoreError::BadPattern(pattern.to_string(), e))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| CoreError::BadPattern("<set>".to_string(), e))?;
        Ok(Self { set })
    }

    pub fn empty() -> Self {
        #[allow(clippy::expect_used)]
        let set = GlobSetBuilder::new().build().expect("empty glob set always builds");
        Self { set }
    }

    /// True iff any configured pattern matches `rel_path`. For a directory,
    /// callers append `/` to `rel_path` first so a pattern like `foo/**`
    /// also matches the directory `foo` itself — used to prune the walk.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

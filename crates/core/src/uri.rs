// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote URI parsing: `scheme://bucket/prefix`.
//!
//! *prefix* is everything after the first `/` following the authority.
//! Parsing is strict: exactly two `://`-separated halves, and the path half
//! must contain at least one `/`. The scheme is preserved but not validated.

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUri {
    pub scheme: String,
    pub bucket: String,
    pub prefix: String,
}

impl RemoteUri {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let mut halves = s.splitn(2, "://");
        let scheme = halves.next().filter(|s| !s.is_empty());
        let rest = halves.next();
        let (scheme, rest) = match (scheme, rest) {
            (Some(scheme), Some(rest)) if !rest.is_empty() => (scheme, rest),
            _ => return Err(CoreError::BadUri(s.to_string(), "expected scheme://bucket/prefix")),
        };
        // Guard against a second "://" — only exactly two halves are valid.
        if rest.contains("://") {
            return Err(CoreError::BadUri(s.to_string(), "more than one scheme separator"));
        }
        let Some(slash) = rest.find('/') else {
            return Err(CoreError::BadUri(s.to_string(), "path half must contain at least one /"));
        };
        let bucket = &rest[..slash];
        let prefix = &rest[slash + 1..];
        if bucket.is_empty() {
            return Err(CoreError::BadUri(s.to_string(), "empty bucket"));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            prefix: prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Build the URI for one object under this bucket, in the form workers
    /// and the page classifier re-parse (`scheme://bucket/key`).
    pub fn object_uri(&self, key: &str) -> String {
        format!("{}://{}/{}", self.scheme, self.bucket, key)
    }
}

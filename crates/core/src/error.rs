// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types owned by the core crate: glob compilation and key relativization.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid exclude pattern {0:?}: {1}")]
    BadPattern(String, globset::Error),

    #[error("key {0:?} is not under prefix {1:?}")]
    NotUnderPrefix(String, String),

    #[error("malformed remote uri {0:?}: {1}")]
    BadUri(String, &'static str),
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal error taxonomy for a pull cycle. Per-task failures do not appear
//! here; they're pushed as strings onto the error aggregator (see
//! [`crate::errors`]).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to walk local inventory: {0}")]
    InventoryFailed(#[source] std::io::Error),

    #[error("local root does not exist: {0}")]
    LocalRootMissing(String),

    #[error("invalid remote uri {0:?}")]
    UriParse(String, #[source] objmirror_core::CoreError),

    #[error("invalid exclude patterns")]
    BadExclude(#[source] objmirror_core::CoreError),

    #[error("listing failed: {0}")]
    ListingFailed(String),

    #[error("could not determine AWS region")]
    RegionDetection,

    #[error("failed to construct object store: {0}")]
    StoreConstruction(#[source] objmirror_adapters::StoreError),

    #[error("failed to create scratch directory: {0}")]
    ScratchDirCreate(#[source] std::io::Error),
}

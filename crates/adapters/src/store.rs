// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ObjectStore` capability interface: listing and ranged-GET of object
//! bytes. Dynamic dispatch over this trait keeps the reconciliation engine
//! unaware of which backend (S3, or a test fake) it's talking to.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWrite;

use objmirror_core::ObjectIdentity;

/// One record from a listing page, in the object store's native key form
/// (forward-slash, may have a trailing `/` for a directory marker).
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    pub key: String,
    pub identity: ObjectIdentity,
}

/// Receives listing pages as the store produces them. The store awaits this
/// call before fetching the next page, so a sink that blocks on a full
/// bounded channel naturally backpressures the listing itself.
#[async_trait]
pub trait PageSink: Send {
    async fn handle_page(&mut self, records: Vec<ObjectRecord>);
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid object uri {0:?}: {1}")]
    UriParse(String, &'static str),

    #[error("could not determine AWS region")]
    RegionDetection,

    #[error("listing failed: {0}")]
    Listing(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Thin abstraction over listing and ranged-GET of object bytes. Credentials,
/// region, endpoint, SSL toggle, and path-style addressing are configured at
/// construction, not per-call.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_pages(&self, prefix: &str, sink: &mut dyn PageSink) -> Result<(), StoreError>;

    async fn download(
        &self,
        key: &str,
        dest: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<(), StoreError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test double for [`ObjectStore`]: returns canned listing pages and writes
//! known bytes, following the fake-over-mock convention the pack favors for
//! this kind of capability interface (see the `RemoteStorage` trait with
//! local/S3 implementations in the neon pageserver's remote-storage module).

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::store::{ObjectRecord, ObjectStore, PageSink, StoreError};

#[derive(Default)]
pub struct FakeStore {
    pages: Vec<Vec<ObjectRecord>>,
    bodies: HashMap<String, Vec<u8>>,
    failing_downloads: HashSet<String>,
    listing_should_fail: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, records: Vec<ObjectRecord>) -> Self {
        self.pages.push(records);
        self
    }

    pub fn with_object(mut self, key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(key.into(), body.into());
        self
    }

    pub fn with_failing_download(mut self, key: impl Into<String>) -> Self {
        self.failing_downloads.insert(key.into());
        self
    }

    pub fn with_failing_listing(mut self) -> Self {
        self.listing_should_fail = true;
        self
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn list_pages(&self, _prefix: &str, sink: &mut dyn PageSink) -> Result<(), StoreError> {
        if self.listing_should_fail {
            return Err(StoreError::Listing("fake listing failure".to_string()));
        }
        for page in &self.pages {
            sink.handle_page(page.clone()).await;
        }
        Ok(())
    }

    async fn download(
        &self,
        key: &str,
        dest: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<(), StoreError> {
        if self.failing_downloads.contains(key) {
            return Err(StoreError::Download(format!("fake failure for {key}")));
        }
        let body = self
            .bodies
            .get(key)
            .ok_or_else(|| StoreError::Download(format!("no fake body for {key}")))?;
        dest.write_all(body).await?;
        Ok(())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production `ObjectStore` backed by `aws-sdk-s3`.
//!
//! Region resolution: use the configured region if present, else fall back
//! to `aws-config`'s default provider chain, which already includes an IMDS
//! (instance-metadata service) credentials/region provider — so there is no
//! separate hand-rolled IMDS client here.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::store::{ObjectRecord, ObjectStore, PageSink, StoreError};
use objmirror_core::ObjectIdentity;

/// Construction-time configuration for the production S3 backend. Credentials
/// are always resolved through the default provider chain; only region,
/// endpoint, and TLS/path-style are overridable here.
#[derive(Debug, Clone, Default)]
pub struct S3StoreConfig {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub disable_ssl: bool,
    pub path_style: bool,
}

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn new(bucket: impl Into<String>, config: &S3StoreConfig) -> Result<Self, StoreError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;

        if shared_config.region().is_none() {
            return Err(StoreError::RegionDetection);
        }

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            let endpoint = if config.disable_ssl {
                endpoint.replacen("https://", "http://", 1)
            } else {
                endpoint.clone()
            };
            builder = builder.endpoint_url(endpoint);
        }
        if config.path_style {
            builder = builder.force_path_style(true);
        }

        Ok(Self { client: Client::from_conf(builder.build()), bucket: bucket.into() })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_pages(&self, prefix: &str, sink: &mut dyn PageSink) -> Result<(), StoreError> {
        let mut continuation_token = None;
        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.clone())
                .send()
                .await
                .map_err(|e| StoreError::Listing(e.to_string()))?;

            let records: Vec<ObjectRecord> = response
                .contents()
                .iter()
                .filter_map(|object| {
                    let key = object.key()?.to_string();
                    let identity = ObjectIdentity::new(object.e_tag().unwrap_or_default());
                    Some(ObjectRecord { key, identity })
                })
                .collect();

            debug!(count = records.len(), prefix, "s3: listed page");
            sink.handle_page(records).await;

            continuation_token = response.next_continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                break;
            }
        }
        Ok(())
    }

    async fn download(
        &self,
        key: &str,
        dest: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Download(e.to_string()))?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Download(e.to_string()))?
            .into_bytes();

        dest.write_all(&bytes).await?;
        Ok(())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated cycle configuration, built once from CLI flags and handed to
//! the periodic loop / driver for the life of the process.

use std::path::PathBuf;
use std::time::Duration;

use objmirror_adapters::S3StoreConfig;
use objmirror_core::{PathMatcher, RemoteUri};

use crate::error::EngineError;

pub const DEFAULT_WORKER_COUNT: usize = 5;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_FILE_MODE: u32 = 0o664;
pub const DEFAULT_STATUS_ADDR: &str = ":8087";
pub const TASK_QUEUE_CAPACITY: usize = 30;
pub const ERROR_QUEUE_CAPACITY: usize = 30;
pub const SCRATCH_DIR_NAME: &str = ".objmirror";

/// Everything one pull cycle (or the periodic loop around it) needs, already
/// validated — the remote URI parsed, excludes compiled into a `GlobSet`,
/// and the local root's existence checked.
pub struct Config {
    pub remote: RemoteUri,
    pub local_root: PathBuf,
    pub matcher: PathMatcher,
    pub interval: Duration,
    pub status_addr: String,
    pub skip_warmup: bool,
    pub file_mode: u32,
    pub worker_count: usize,
    pub s3: S3StoreConfig,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        remote_uri: &str,
        local_path: impl Into<PathBuf>,
        excludes: &[String],
        interval: Duration,
        status_addr: String,
        skip_warmup: bool,
        file_mode: u32,
        s3: S3StoreConfig,
    ) -> Result<Self, EngineError> {
        let remote = RemoteUri::parse(remote_uri)
            .map_err(|e| EngineError::UriParse(remote_uri.to_string(), e))?;
        let local_root = local_path.into();
        if !local_root.is_dir() {
            return Err(EngineError::LocalRootMissing(local_root.display().to_string()));
        }
        let matcher = PathMatcher::new(excludes).map_err(EngineError::BadExclude)?;
        Ok(Self {
            remote,
            local_root,
            matcher,
            interval,
            status_addr,
            skip_warmup,
            file_mode,
            worker_count: DEFAULT_WORKER_COUNT,
            s3,
        })
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.local_root.join(SCRATCH_DIR_NAME)
    }
}

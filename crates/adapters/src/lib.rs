// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! objmirror-adapters: the `ObjectStore` capability interface plus the
//! production S3 backend and a test fake.

pub mod s3;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use s3::{S3Store, S3StoreConfig};
pub use store::{ObjectRecord, ObjectStore, PageSink, StoreError};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStore;

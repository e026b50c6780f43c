// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use objmirror_adapters::FakeStore;
use objmirror_core::{ObjectIdentity, RelativeKey};
use tempfile::TempDir;

async fn drain(handles: Vec<tokio::task::JoinHandle<()>>) {
    for h in handles {
        h.await.unwrap();
    }
}

#[tokio::test]
async fn s5_creates_nested_parent_directories_before_placing_the_file() {
    let root = TempDir::new().unwrap();
    let scratch = root.path().join(".objmirror");
    tokio::fs::create_dir_all(&scratch).await.unwrap();
    let store: Arc<dyn ObjectStore> =
        Arc::new(FakeStore::new().with_object("efg/123/foo/bar", b"hello".to_vec()));
    let cache = Arc::new(IdentityCache::new());
    let (task_tx, task_rx) = mpsc::channel(30);
    let (error_tx, mut error_rx) = mpsc::channel(30);

    let dest = root.path().join("123/foo/bar");
    let task = DownloadTask {
        remote_uri: "s3://bucket/efg/123/foo/bar".to_string(),
        local_path: dest.clone(),
        identity: ObjectIdentity::new("\"1\""),
        key: RelativeKey::new("123/foo/bar").unwrap(),
    };
    task_tx.send(task).await.unwrap();
    drop(task_tx);

    let handles = spawn_workers(5, store, scratch, 0o664, Arc::clone(&cache), task_rx, error_tx);
    drain(handles).await;

    assert!(error_rx.try_recv().is_err());
    assert!(root.path().join("123").is_dir());
    assert!(root.path().join("123/foo").is_dir());
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"hello");
    assert_eq!(
        cache.get(&RelativeKey::new("123/foo/bar").unwrap()).unwrap(),
        ObjectIdentity::new("\"1\"")
    );
}

#[tokio::test]
async fn download_failure_reports_error_and_does_not_update_cache_or_place_file() {
    let root = TempDir::new().unwrap();
    let scratch = root.path().join(".objmirror");
    tokio::fs::create_dir_all(&scratch).await.unwrap();
    let store: Arc<dyn ObjectStore> =
        Arc::new(FakeStore::new().with_failing_download("bad/key"));
    let cache = Arc::new(IdentityCache::new());
    let (task_tx, task_rx) = mpsc::channel(30);
    let (error_tx, mut error_rx) = mpsc::channel(30);

    let dest = root.path().join("bad/key");
    let task = DownloadTask {
        remote_uri: "s3://bucket/bad/key".to_string(),
        local_path: dest.clone(),
        identity: ObjectIdentity::new("\"1\""),
        key: RelativeKey::new("bad/key").unwrap(),
    };
    task_tx.send(task).await.unwrap();
    drop(task_tx);

    let handles = spawn_workers(1, store, scratch, 0o664, Arc::clone(&cache), task_rx, error_tx);
    drain(handles).await;

    assert!(error_rx.try_recv().is_ok());
    assert!(!dest.exists());
    assert!(cache.get(&RelativeKey::new("bad/key").unwrap()).is_none());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use objmirror_adapters::{FakeStore, ObjectRecord, S3StoreConfig};
use objmirror_core::{NoopMetricsSink, ObjectIdentity, RelativeKey};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn base_config(root: &std::path::Path, remote_uri: &str, excludes: &[String]) -> Config {
    Config::build(
        remote_uri,
        root,
        excludes,
        Duration::from_secs(5),
        ":0".to_string(),
        true,
        0o664,
        S3StoreConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn s2_download_and_delete() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("bar")).unwrap();
    fs::write(root.path().join("bar/a.go"), b"old").unwrap();
    fs::write(root.path().join("bar/a.deleted.go"), b"stale").unwrap();
    fs::write(root.path().join("b.file"), b"old").unwrap();
    fs::write(root.path().join("b.deleted.file"), b"stale").unwrap();

    let config = base_config(root.path(), "s3://bucket/home/dags", &[]);
    let store: Arc<dyn ObjectStore> = Arc::new(
        FakeStore::new()
            .with_page(vec![
                ObjectRecord { key: "home/dags/bar/a.go".into(), identity: ObjectIdentity::new("\"new1\"") },
                ObjectRecord { key: "home/dags/b.file".into(), identity: ObjectIdentity::new("\"new2\"") },
            ])
            .with_object("home/dags/bar/a.go", b"new-a".to_vec())
            .with_object("home/dags/b.file", b"new-b".to_vec()),
    );
    let cache = Arc::new(IdentityCache::new());
    let metrics = NoopMetricsSink;

    let result = pull(&config, store, Arc::clone(&cache), &metrics).await.unwrap();

    assert_eq!(result, "");
    assert_eq!(fs::read(root.path().join("bar/a.go")).unwrap(), b"new-a");
    assert_eq!(fs::read(root.path().join("b.file")).unwrap(), b"new-b");
    assert!(!root.path().join("bar/a.deleted.go").exists());
    assert!(!root.path().join("b.deleted.file").exists());
    assert_eq!(cache.get(&RelativeKey::new("bar/a.go").unwrap()).unwrap().as_str(), "\"new1\"");
}

#[tokio::test]
async fn invariant_1_idempotence_under_no_change() {
    let root = TempDir::new().unwrap();
    let config = base_config(root.path(), "s3://bucket/home/dags", &[]);
    let cache = Arc::new(IdentityCache::new());
    let metrics = NoopMetricsSink;

    let page = vec![ObjectRecord { key: "home/dags/b.file".into(), identity: ObjectIdentity::new("\"1\"") }];
    let store_one: Arc<dyn ObjectStore> = Arc::new(
        FakeStore::new().with_page(page.clone()).with_object("home/dags/b.file", b"hello".to_vec()),
    );
    pull(&config, store_one, Arc::clone(&cache), &metrics).await.unwrap();

    let store_two: Arc<dyn ObjectStore> = Arc::new(FakeStore::new().with_page(page));
    let second = pull(&config, store_two, Arc::clone(&cache), &metrics).await.unwrap();

    assert_eq!(second, "");
    assert!(root.path().join("b.file").exists());
}

#[tokio::test]
async fn listing_failure_is_fatal_and_skips_stale_deletion() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("keep.me"), b"x").unwrap();
    let config = base_config(root.path(), "s3://bucket/home/dags", &[]);
    let cache = Arc::new(IdentityCache::new());
    let metrics = NoopMetricsSink;

    let store: Arc<dyn ObjectStore> = Arc::new(FakeStore::new().with_failing_listing());
    let err = pull(&config, store, cache, &metrics).await.unwrap_err();

    assert!(matches!(err, EngineError::ListingFailed(_)));
    assert!(root.path().join("keep.me").exists());
}

#[tokio::test]
async fn invariant_3_deletion_completeness() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("stale.txt"), b"old").unwrap();
    fs::create_dir_all(root.path().join("keep_dir")).unwrap();
    fs::write(root.path().join("keep_dir/stale_nested.txt"), b"old").unwrap();

    let config = base_config(root.path(), "s3://bucket/home", &[]);
    let cache = Arc::new(IdentityCache::new());
    let metrics = NoopMetricsSink;

    let store: Arc<dyn ObjectStore> = Arc::new(
        FakeStore::new()
            .with_page(vec![ObjectRecord { key: "home/fresh.txt".into(), identity: ObjectIdentity::new("\"1\"") }])
            .with_object("home/fresh.txt", b"new".to_vec()),
    );

    pull(&config, store, cache, &metrics).await.unwrap();

    let mut remaining: Vec<_> = fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["fresh.txt".to_string()]);
}

#[tokio::test]
async fn invariant_8_worker_count_does_not_change_final_contents() {
    for worker_count in [1usize, 5, 20] {
        let root = TempDir::new().unwrap();
        let mut config = base_config(root.path(), "s3://bucket/home", &[]);
        config.worker_count = worker_count;
        let cache = Arc::new(IdentityCache::new());
        let metrics = NoopMetricsSink;

        let records: Vec<_> = (0..15)
            .map(|i| ObjectRecord { key: format!("home/dir{}/f{}.txt", i % 3, i), identity: ObjectIdentity::new("\"1\"") })
            .collect();
        let mut store_builder = FakeStore::new().with_page(records.clone());
        for i in 0..15 {
            store_builder = store_builder.with_object(format!("home/dir{}/f{}.txt", i % 3, i), format!("body-{i}").into_bytes());
        }
        let store: Arc<dyn ObjectStore> = Arc::new(store_builder);

        pull(&config, store, Arc::clone(&cache), &metrics).await.unwrap();

        for i in 0..15 {
            let path = root.path().join(format!("dir{}/f{}.txt", i % 3, i));
            assert_eq!(fs::read_to_string(&path).unwrap(), format!("body-{i}"), "worker_count={worker_count}");
        }
    }
}

#[tokio::test]
async fn s4_exclude_patterns_are_neither_downloaded_nor_deleted() {
    let root = TempDir::new().unwrap();
    let excludes = vec!["airflow.cfg".to_string(), "webserver_config.py".to_string(), "config/**".to_string()];
    let config = base_config(root.path(), "s3://bucket/home", &excludes);
    let cache = Arc::new(IdentityCache::new());
    let metrics = NoopMetricsSink;

    let store: Arc<dyn ObjectStore> = Arc::new(
        FakeStore::new()
            .with_page(vec![
                ObjectRecord { key: "home/dags/b.file".into(), identity: ObjectIdentity::new("\"1\"") },
                ObjectRecord { key: "home/airflow.cfg".into(), identity: ObjectIdentity::new("\"1\"") },
                ObjectRecord { key: "home/config/a.file".into(), identity: ObjectIdentity::new("\"1\"") },
                ObjectRecord { key: "home/webserver_config.py".into(), identity: ObjectIdentity::new("\"1\"") },
            ])
            .with_object("home/dags/b.file", b"hi".to_vec()),
    );

    pull(&config, store, cache, &metrics).await.unwrap();

    assert!(root.path().join("dags/b.file").exists());
    assert!(!root.path().join("airflow.cfg").exists());
    assert!(!root.path().join("config/a.file").exists());
    assert!(!root.path().join("webserver_config.py").exists());
}

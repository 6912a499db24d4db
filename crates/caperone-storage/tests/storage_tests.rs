// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the filesystem stores.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use caperone_core::{AssetStore, ContactEntry, ContactStore, StoreError};
use caperone_storage::{DiskAssetStore, JsonContactLog};

fn entry(i: usize) -> ContactEntry {
    ContactEntry {
        name: format!("Sender {i}"),
        email: format!("sender{i}@example.com"),
        message: format!("Message number {i}"),
        received_at: Utc.timestamp_millis_opt(1_700_000_000_000 + i as i64).unwrap(),
    }
}

// ---- Contact log ----

#[tokio::test]
async fn missing_log_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let log = JsonContactLog::new(dir.path().join("contacts.json"));
    assert!(log.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn sequential_appends_persist_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    let log = JsonContactLog::new(&path);

    for i in 0..5 {
        log.append(entry(i)).await.unwrap();
    }

    let entries = log.read_all().await.unwrap();
    assert_eq!(entries, (0..5).map(entry).collect::<Vec<_>>());

    // A fresh instance sees the same file.
    let reopened = JsonContactLog::new(&path);
    assert_eq!(reopened.read_all().await.unwrap().len(), 5);

    // Pretty-printed JSON array on disk.
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("[\n  {"));
    assert!(raw.contains("\"receivedAt\""));
    assert!(!dir.path().join("contacts.json.tmp").exists());
}

#[tokio::test]
async fn concurrent_appends_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(JsonContactLog::new(dir.path().join("contacts.json")));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..40 {
        let log = Arc::clone(&log);
        tasks.spawn(async move { log.append(entry(i)).await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let mut names: Vec<String> = log
        .read_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names.len(), 40);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 40);
}

#[tokio::test]
async fn parent_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let log = JsonContactLog::new(dir.path().join("data/nested/contacts.json"));
    log.append(entry(1)).await.unwrap();
    assert_eq!(log.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn corrupt_log_is_reported_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    let log = JsonContactLog::new(&path);

    log.append(entry(1)).await.unwrap();
    log.append(entry(2)).await.unwrap();
    assert_eq!(log.read_all().await.unwrap().len(), 2);

    std::fs::write(&path, "this is not json").unwrap();
    let err = log.append(entry(3)).await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "this is not json");
}

#[tokio::test]
async fn corrupt_log_is_quarantined_when_recovery_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    std::fs::write(&path, "{\"truncated\": ").unwrap();

    let log = JsonContactLog::new(&path).with_corrupt_recovery(true);
    log.append(entry(7)).await.unwrap();

    assert_eq!(log.read_all().await.unwrap(), vec![entry(7)]);
    let quarantined: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("contacts.json.corrupt-"))
        .collect();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(
        std::fs::read_to_string(quarantined[0].path()).unwrap(),
        "{\"truncated\": "
    );
}

#[tokio::test]
async fn log_that_is_not_an_array_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    std::fs::write(&path, "{\"name\": \"x\"}").unwrap();
    let log = JsonContactLog::new(&path);
    assert!(matches!(
        log.read_all().await.unwrap_err(),
        StoreError::Corrupt { .. }
    ));
}

// ---- Uploads ----

#[tokio::test]
async fn ensure_ready_is_idempotent_and_keeps_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskAssetStore::new(dir.path().join("uploads"));

    store.ensure_ready().await.unwrap();
    let asset = store.store(b"jpeg-bytes", "truck.jpg").await.unwrap();
    store.ensure_ready().await.unwrap();

    let path = store.resolve(&asset.stored_name).await.unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"jpeg-bytes");
}

#[tokio::test]
async fn store_creates_directory_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskAssetStore::new(dir.path().join("fresh/uploads"));
    let asset = store.store(b"x", "a.png").await.unwrap();
    assert!(dir.path().join("fresh/uploads").join(&asset.stored_name).is_file());
}

#[tokio::test]
async fn stored_name_is_timestamp_prefixed() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskAssetStore::new(dir.path());
    let asset = store.store(b"x", "container photo.jpg").await.unwrap();

    let (millis, rest) = asset.stored_name.split_once('-').unwrap();
    assert!(millis.parse::<i64>().unwrap() > 1_600_000_000_000);
    assert_eq!(rest, "container_photo.jpg");
    assert_eq!(asset.original_name, "container photo.jpg");
    assert_eq!(asset.access_path, format!("/uploads/{}", asset.stored_name));
}

#[tokio::test]
async fn same_name_uploads_never_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskAssetStore::new(dir.path());

    let mut stored = Vec::new();
    for i in 0..5u8 {
        let asset = store.store(&[i], "same.jpg").await.unwrap();
        stored.push(asset);
    }

    let mut names: Vec<_> = stored.iter().map(|a| a.stored_name.clone()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 5);

    for (i, asset) in stored.iter().enumerate() {
        let path = store.resolve(&asset.stored_name).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![i as u8]);
    }
}

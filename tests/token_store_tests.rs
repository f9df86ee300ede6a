// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed token store tests against a temporary directory.

mod common;

use common::test_token;
use whoop_sync::error::AppError;
use whoop_sync::store::{FileTokenStore, TokenStore};

#[test]
fn round_trips_a_token_field_for_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token.json"));

    let token = test_token();
    store.save(&token).unwrap();

    let loaded = store.load().unwrap().expect("token should be present");
    assert_eq!(loaded, token);
}

#[test]
fn missing_file_is_absence_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token.json"));

    assert!(store.load().unwrap().is_none());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = FileTokenStore::new(path);
    let err = store.load().unwrap_err();

    assert!(matches!(err, AppError::TokenStore(_)));
    assert!(err.to_string().contains("corrupt"));
}

#[test]
fn save_overwrites_whole_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token.json"));

    let first = test_token();
    store.save(&first).unwrap();

    let mut second = test_token();
    second.access_token = "rotated_access".to_string();
    second.refresh_token = "rotated_refresh".to_string();
    store.save(&second).unwrap();

    assert_eq!(store.load().unwrap().unwrap(), second);

    // Only the token file itself remains; the temp file was renamed away
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("token.json")]);
}

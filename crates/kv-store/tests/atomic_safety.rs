//! Atomic write safety tests
//!
//! Validates roundtrip preservation of values through the file store,
//! temp-file cleanup, and directory resolution.

use kv_store::{ChangeFeed, FileStore, KeyValueStore, DEFAULT_CAPACITY_BYTES};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::tempdir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_roundtrip_preserves_exact_bytes() {
    init_logging();
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path()).expect("open should succeed");

    let value = r#"{"layout":{"rows":2,"cols":2},"widgets":[{"id":"chart-0","type":"chart"},null,null,null]}"#;
    store.set("savedLayout", value).expect("set should succeed");

    let read = store
        .get("savedLayout")
        .expect("get should succeed")
        .expect("value should exist");
    assert_eq!(read, value);
}

#[test]
fn test_overwrite_leaves_no_temp_files() {
    init_logging();
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path()).expect("open should succeed");

    for i in 0..5 {
        store
            .set("savedLayout", &format!("{{\"generation\":{i}}}"))
            .expect("set should succeed");
    }

    let names: Vec<String> = fs::read_dir(dir.path())
        .expect("read_dir failed")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["savedLayout.json".to_string()]);
    assert_eq!(
        store.get("savedLayout").expect("get should succeed").as_deref(),
        Some("{\"generation\":4}")
    );
}

#[test]
fn test_default_capacity_accepts_value_at_ceiling() {
    init_logging();
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path())
        .expect("open should succeed")
        .with_capacity(DEFAULT_CAPACITY_BYTES);

    let at_limit = "x".repeat(DEFAULT_CAPACITY_BYTES);
    store.set("savedLayout", &at_limit).expect("value at limit should be stored");

    let over = "x".repeat(DEFAULT_CAPACITY_BYTES + 1);
    assert!(store.set("savedLayout", &over).is_err());
    assert_eq!(
        store
            .get("savedLayout")
            .expect("get should succeed")
            .map(|v| v.len()),
        Some(DEFAULT_CAPACITY_BYTES),
        "rejected write must not replace the previous value"
    );
}

#[test]
fn test_hand_edited_file_is_detected() {
    init_logging();
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path()).expect("open should succeed");
    store.set("widgetColors", "{}").expect("set should succeed");

    fs::write(store.path_for("widgetColors"), "{\"chart-0\":\"2\"}").expect("Write failed");

    assert_eq!(
        store.poll_changes().expect("poll should succeed"),
        vec!["widgetColors"]
    );
    assert_eq!(
        store.get("widgetColors").expect("get should succeed").as_deref(),
        Some("{\"chart-0\":\"2\"}")
    );
}

#[test]
#[serial(xdg_data)]
fn test_default_dir_honors_xdg_data_home() {
    let original = env::var("XDG_DATA_HOME").ok();
    env::set_var("XDG_DATA_HOME", "/custom/data");

    let dir = FileStore::default_dir("gridboard");

    match original {
        Some(v) => env::set_var("XDG_DATA_HOME", v),
        None => env::remove_var("XDG_DATA_HOME"),
    }
    assert_eq!(dir, Some(std::path::PathBuf::from("/custom/data/gridboard")));
}

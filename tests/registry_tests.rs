//! Table Registry Tests
//!
//! These tests verify:
//! - Tables survive a registry reopen
//! - Directories without valid metadata are skipped or rejected
//! - Close semantics and name leases

use std::fs;
use std::sync::Arc;

use tablewire::table::{TableRegistry, DATA_FILENAME, META_FILENAME};
use tablewire::{ErrorKind, TableWireError};
use tempfile::TempDir;

#[test]
fn test_open_creates_data_dir() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("nested/data");

    let registry = TableRegistry::open(&data_dir).unwrap();

    assert!(data_dir.is_dir());
    assert!(registry.is_empty());
    assert_eq!(registry.table_path("users"), data_dir.join("users"));
}

#[test]
fn test_reopen_discovers_tables() {
    let temp = TempDir::new().unwrap();
    {
        let registry = TableRegistry::open(temp.path()).unwrap();
        for name in ["users", "events", "orders"] {
            registry.create_table(name).unwrap();
        }
    }

    let registry = TableRegistry::open(temp.path()).unwrap();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.table_names(), vec!["events", "orders", "users"]);

    let lease = registry.get_table("events").unwrap();
    assert_eq!(lease.table().name(), "events");
    assert!(lease.table().is_open());
}

#[test]
fn test_open_skips_foreign_entries() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("no_meta")).unwrap();
    fs::write(temp.path().join("loose_file"), b"x").unwrap();

    let registry = TableRegistry::open(temp.path()).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_open_rejects_corrupted_meta() {
    let temp = TempDir::new().unwrap();
    {
        let registry = TableRegistry::open(temp.path()).unwrap();
        registry.create_table("users").unwrap();
    }

    let meta_path = temp.path().join("users").join(META_FILENAME);
    let mut bytes = fs::read(&meta_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&meta_path, bytes).unwrap();

    let err = TableRegistry::open(temp.path()).unwrap_err();
    assert!(matches!(err, TableWireError::Storage(_)));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_create_writes_layout() {
    let temp = TempDir::new().unwrap();
    let registry = TableRegistry::open(temp.path()).unwrap();

    let lease = registry.create_table("users").unwrap();
    let path = lease.table().path().to_path_buf();

    assert_eq!(path, registry.table_path("users"));
    assert!(path.join(META_FILENAME).is_file());
    assert!(path.join(DATA_FILENAME).is_file());
    assert_eq!(lease.table().name(), "users");
}

#[test]
fn test_get_missing_table() {
    let temp = TempDir::new().unwrap();
    let registry = TableRegistry::open(temp.path()).unwrap();

    let err = registry.get_table("ghost").unwrap_err();
    assert!(matches!(err, TableWireError::TableNotFound(ref name) if name == "ghost"));

    // The failed lookup must not keep the name
    registry.create_table("ghost").unwrap();
}

#[test]
fn test_close_table_unregisters() {
    let temp = TempDir::new().unwrap();
    let registry = TableRegistry::open(temp.path()).unwrap();
    drop(registry.create_table("users").unwrap());

    let lease = registry.get_table("users").unwrap();
    let table = Arc::downgrade(lease.table());
    let name_lease = registry.close_table(lease).unwrap();

    assert_eq!(name_lease.name(), "users");
    assert!(!registry.contains("users"));
    assert!(table.upgrade().is_none());
    // Files are left for the caller
    assert!(registry.table_path("users").join(META_FILENAME).exists());
}

#[test]
fn test_close_table_with_outside_reference() {
    let temp = TempDir::new().unwrap();
    let registry = TableRegistry::open(temp.path()).unwrap();
    let held = Arc::clone(registry.create_table("users").unwrap().table());

    let lease = registry.get_table("users").unwrap();
    let err = registry.close_table(lease).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Close);
    assert!(registry.contains("users"));
    assert!(held.is_open());

    // Lease was released on failure
    drop(registry.get_table("users").unwrap());
}

#[test]
fn test_close_table_from_other_registry() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let first = TableRegistry::open(first_dir.path()).unwrap();
    let second = TableRegistry::open(second_dir.path()).unwrap();
    drop(first.create_table("users").unwrap());

    let lease = first.get_table("users").unwrap();
    let err = second.close_table(lease).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Close);
    assert!(first.contains("users"));
}

//! Tests for the Database handle
//!
//! These tests verify:
//! - Open/create lifecycle and configuration validation
//! - Commits publish new snapshots; held snapshots stay unchanged
//! - Reopen picks up revisions written by another writer
//! - Readers see consistent snapshots while a writer commits

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use revstore::{Config, Database, RecoveryPolicy, RevError, Table, VersionManager};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_db() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("db");
    (temp_dir, path)
}

fn config_for(path: &PathBuf) -> Config {
    Config::builder().data_dir(path).build()
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_create_makes_directory_and_revision_zero() {
    let (_temp, path) = setup_temp_db();
    assert!(!path.exists());

    let db = Database::create(config_for(&path)).unwrap();

    assert!(path.is_dir());
    assert!(path.join("v00000000").exists());
    assert_eq!(db.revision(), 0);
    assert!(!db.snapshot().uuid.is_nil());
    assert_eq!(db.data_dir(), path.as_path());
    assert_eq!(db.config().recovery_policy, RecoveryPolicy::Strict);
}

#[test]
fn test_create_twice_is_logic_error() {
    let (_temp, path) = setup_temp_db();
    Database::create(config_for(&path)).unwrap();

    let err = Database::create(config_for(&path)).err().unwrap();
    assert!(matches!(err, RevError::Logic(_)));
}

#[test]
fn test_open_path_on_empty_directory() {
    let (_temp, path) = setup_temp_db();
    std::fs::create_dir_all(&path).unwrap();

    let db = Database::open_path(&path).unwrap();
    let snapshot = db.snapshot();

    assert_eq!(snapshot.revision, 0);
    assert!(snapshot.uuid.is_nil());
    assert!(snapshot.roots.is_empty());
}

#[test]
fn test_empty_data_dir_rejected() {
    let config = Config::builder().data_dir("").build();

    let err = Database::open(config).err().unwrap();
    assert!(matches!(err, RevError::Config(_)));
}

// =============================================================================
// Commit / Snapshot Tests
// =============================================================================

#[test]
fn test_commit_publishes_snapshot() {
    let (_temp, path) = setup_temp_db();
    let db = Database::create(config_for(&path)).unwrap();

    db.set_root(Table::PostList, Some(42));
    assert_eq!(db.root(Table::PostList), None);

    let snapshot = db.commit(1).unwrap();
    assert_eq!(snapshot.revision, 1);
    assert_eq!(snapshot.root(Table::PostList), Some(42));
    assert_eq!(db.root(Table::PostList), Some(42));
}

#[test]
fn test_held_snapshot_unaffected_by_commit() {
    let (_temp, path) = setup_temp_db();
    let db = Database::create(config_for(&path)).unwrap();
    let before = db.snapshot();

    db.set_root(Table::Record, Some(7));
    db.commit(1).unwrap();

    assert_eq!(before.revision, 0);
    assert_eq!(before.root(Table::Record), None);
    assert_eq!(db.snapshot().root(Table::Record), Some(7));
}

#[test]
fn test_commit_next_increments() {
    let (_temp, path) = setup_temp_db();
    let db = Database::create(config_for(&path)).unwrap();

    assert_eq!(db.commit_next().unwrap().revision, 1);
    assert_eq!(db.commit_next().unwrap().revision, 2);
    assert_eq!(db.revision(), 2);
}

#[test]
fn test_discard_drops_staged_roots() {
    let (_temp, path) = setup_temp_db();
    let db = Database::create(config_for(&path)).unwrap();

    db.set_root(Table::TermList, Some(5));
    db.discard();
    db.commit(1).unwrap();

    assert_eq!(db.root(Table::TermList), None);
}

#[test]
fn test_backwards_commit_keeps_published_snapshot() {
    let (_temp, path) = setup_temp_db();
    let db = Database::create(config_for(&path)).unwrap();
    db.commit(5).unwrap();

    let err = db.commit(2).err().unwrap();
    assert!(matches!(err, RevError::Logic(_)));
    assert_eq!(db.revision(), 5);
}

// =============================================================================
// Reopen Tests
// =============================================================================

#[test]
fn test_reopen_sees_other_writer() {
    let (_temp, path) = setup_temp_db();
    let reader = Database::create(config_for(&path)).unwrap();

    let mut writer = VersionManager::new();
    writer.open_most_recent(&path).unwrap();
    writer.set_root(Table::Position, Some(314));
    writer.commit(&path, 4).unwrap();

    assert_eq!(reader.revision(), 0);

    let snapshot = reader.reopen().unwrap();
    assert_eq!(snapshot.revision, 4);
    assert_eq!(snapshot.root(Table::Position), Some(314));
    assert_eq!(snapshot.uuid, writer.uuid());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_readers_see_consistent_snapshots_during_commits() {
    let (_temp, path) = setup_temp_db();
    let db = Arc::new(Database::create(config_for(&path)).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let db = Arc::clone(&db);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last = 0;
                while !done.load(Ordering::Acquire) {
                    let snapshot = db.snapshot();
                    assert!(snapshot.revision >= last);
                    // Every commit stores its own revision in both tables
                    if snapshot.revision > 0 {
                        assert_eq!(snapshot.root(Table::PostList), Some(snapshot.revision));
                        assert_eq!(snapshot.root(Table::Record), Some(snapshot.revision));
                    }
                    last = snapshot.revision;
                }
            })
        })
        .collect();

    for rev in 1..=20 {
        db.set_root(Table::PostList, Some(rev));
        db.set_root(Table::Record, Some(rev));
        db.commit(rev).unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(db.revision(), 20);
}

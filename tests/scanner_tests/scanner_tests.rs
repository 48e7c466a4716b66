//! Tests for the snapshot directory scanner
//!
//! These tests verify:
//! - Revision file naming and parsing
//! - Only exact `v` + 8 lowercase hex names are candidates
//! - The greatest revision wins, regardless of file contents
//! - Listing is sorted oldest first

use std::fs;
use std::path::{Path, PathBuf};

use revstore::scanner::{
    find_latest, list_revisions, parse_revision_file_name, revision_file_name, RevisionFile,
    TEMP_FILE_NAME,
};
use revstore::RevError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"not a real revision").unwrap();
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_revision_file_name_is_fixed_width_hex() {
    assert_eq!(revision_file_name(0), "v00000000");
    assert_eq!(revision_file_name(26), "v0000001a");
    assert_eq!(revision_file_name(u32::MAX), "vffffffff");
}

#[test]
fn test_parse_revision_file_name() {
    assert_eq!(parse_revision_file_name("v0000001a"), Some(26));
    assert_eq!(parse_revision_file_name("vffffffff"), Some(u32::MAX));
    assert_eq!(parse_revision_file_name(&revision_file_name(12345)), Some(12345));
}

#[test]
fn test_parse_rejects_near_misses() {
    for name in [
        TEMP_FILE_NAME,
        "v",
        "v0000001",
        "v000000001",
        "v0000001A",
        "V0000001a",
        "x0000001a",
        "v0000000g",
        "v0000001a.bak",
        "v+0000001",
        "vv0000001",
    ] {
        assert_eq!(parse_revision_file_name(name), None, "{}", name);
    }
}

// =============================================================================
// find_latest Tests
// =============================================================================

#[test]
fn test_find_latest_empty_directory() {
    let (_temp, dir) = setup_temp_dir();
    assert_eq!(find_latest(&dir).unwrap(), None);
}

#[test]
fn test_find_latest_ignores_non_candidates() {
    let (_temp, dir) = setup_temp_dir();
    for name in [TEMP_FILE_NAME, "v0000001A", "v000000001", "v0000000", "postlist.DB", "v00000003.bak"] {
        touch(&dir, name);
    }

    assert_eq!(find_latest(&dir).unwrap(), None);
}

#[test]
fn test_find_latest_picks_greatest_revision() {
    let (_temp, dir) = setup_temp_dir();
    for name in ["v00000001", "v0000001a", "v00000002", "v00000019"] {
        touch(&dir, name);
    }
    touch(&dir, TEMP_FILE_NAME);
    touch(&dir, "v000000ff.old");

    let latest = find_latest(&dir).unwrap().unwrap();
    assert_eq!(
        latest,
        RevisionFile {
            revision: 26,
            path: dir.join("v0000001a"),
        }
    );
}

#[test]
fn test_find_latest_does_not_validate_contents() {
    let (_temp, dir) = setup_temp_dir();
    touch(&dir, "v00000007");

    // Garbage contents, still the newest candidate
    let latest = find_latest(&dir).unwrap().unwrap();
    assert_eq!(latest.revision, 7);
}

#[test]
fn test_find_latest_missing_directory_is_opening_error() {
    let (_temp, dir) = setup_temp_dir();
    let missing = dir.join("does_not_exist");

    let err = find_latest(&missing).unwrap_err();
    assert!(matches!(err, RevError::Opening { ref path, .. } if path == &missing));
}

// =============================================================================
// list_revisions Tests
// =============================================================================

#[test]
fn test_list_revisions_sorted_oldest_first() {
    let (_temp, dir) = setup_temp_dir();
    for name in ["v00000010", "v00000002", "v0000000a", "v00000001"] {
        touch(&dir, name);
    }
    touch(&dir, TEMP_FILE_NAME);

    let revisions: Vec<u32> = list_revisions(&dir)
        .unwrap()
        .into_iter()
        .map(|f| f.revision)
        .collect();
    assert_eq!(revisions, vec![1, 2, 10, 16]);
}

#[test]
fn test_list_revisions_paths_point_into_directory() {
    let (_temp, dir) = setup_temp_dir();
    touch(&dir, "v00000003");

    let files = list_revisions(&dir).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, dir.join("v00000003"));
    assert!(files[0].path.exists());
}

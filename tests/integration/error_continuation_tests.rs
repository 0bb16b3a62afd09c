//! Unreadable files and directories are skipped, not fatal.
//!
//! Permission tests are skipped when running as root, which can read anything.

#![cfg(unix)]

use dupsweep::duplicates::DuplicateFinder;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::tempdir;

fn running_as_root(locked: &std::path::Path) -> bool {
    fs::read_dir(locked).is_ok()
}

#[test]
fn test_unreadable_directory_is_reported_and_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    fs::write(dir.path().join("b"), "X").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("c"), "X").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if running_as_root(&locked) {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (ledger, summary) = result.unwrap();
    assert_eq!(summary.scan_errors.len(), 1);
    assert_eq!(ledger.duplicate_count(), 1);
}

#[test]
fn test_unreadable_file_is_excluded() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    let locked = dir.path().join("b");
    fs::write(&locked, "X").unwrap();
    fs::write(dir.path().join("c"), "X").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read(&locked).is_ok() {
        return;
    }

    let (ledger, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert!(summary.failed_hashes >= 1);
    let group = ledger.groups().next().unwrap();
    assert_eq!(group.original.path(), dir.path().join("a"));
    assert_eq!(group.copies.len(), 1);
    assert_eq!(group.copies[0].path(), dir.path().join("c"));
}

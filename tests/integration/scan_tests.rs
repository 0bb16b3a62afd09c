use dupsweep::duplicates::{DuplicateFinder, FinderConfig, GroupLedger};
use dupsweep::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn copy_paths(ledger: &GroupLedger) -> Vec<String> {
    ledger
        .groups()
        .flat_map(|g| g.copies)
        .map(|c| c.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (ledger, summary) = finder
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert!(ledger.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let (ledger, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert!(ledger.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"duplicate");
    write(&dir.path().join("b.txt"), b"duplicate");
    write(&dir.path().join("c.txt"), b"unique!!!");

    let (ledger, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(ledger.group_count(), 1);
    assert_eq!(copy_paths(&ledger), vec!["b.txt"]);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 9);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    write(&dir.path().join("a.txt"), b"shared");
    write(&sub.join("b.txt"), b"shared");

    let (ledger, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    let group = ledger.groups().next().unwrap();
    assert_eq!(group.original.path(), dir.path().join("a.txt"));
    assert_eq!(group.copies[0].path(), sub.join("b.txt"));
}

#[test]
fn test_scan_one_original_many_copies() {
    let dir = tempdir().unwrap();
    for name in ["1", "2", "3", "4", "5"] {
        write(&dir.path().join(name), b"five of a kind");
    }

    let (ledger, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(ledger.group_count(), 1);
    assert_eq!(copy_paths(&ledger), vec!["2", "3", "4", "5"]);
    assert_eq!(summary.duplicate_files, 4);
    assert_eq!(summary.reclaimable_space, 4 * 14);
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"aaaa");
    write(&dir.path().join("b"), b"bbbb");
    write(&dir.path().join("c"), b"aaaa");
    write(&dir.path().join("d"), b"bbbb");

    let (ledger, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.duplicate_groups, 2);
    // Most recently confirmed group first.
    let originals: Vec<_> = ledger
        .groups()
        .map(|g| g.original.path().to_path_buf())
        .collect();
    assert_eq!(originals, vec![dir.path().join("b"), dir.path().join("a")]);
}

#[test]
fn test_scan_large_files_differing_at_end() {
    let dir = tempdir().unwrap();
    let mut content = vec![7u8; 300 * 1024];
    write(&dir.path().join("a.bin"), &content);
    write(&dir.path().join("b.bin"), &content);
    *content.last_mut().unwrap() = 8;
    write(&dir.path().join("c.bin"), &content);

    let (ledger, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(copy_paths(&ledger), vec!["b.bin"]);
}

#[test]
fn test_scan_skip_hidden() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("visible"), b"data");
    write(&dir.path().join(".hidden"), b"data");

    let (ledger, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(ledger.group_count(), 1);

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, false));
    let (ledger, summary) = DuplicateFinder::new(config)
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    assert!(ledger.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_small_chunk_size_matches_default() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..5000u32).map(|i| (i % 97) as u8).collect();
    write(&dir.path().join("a"), &content);
    write(&dir.path().join("b"), &content);

    let config = FinderConfig::default()
        .with_chunk_size(13)
        .with_prefix_bytes(5);
    let (_, summary) = DuplicateFinder::new(config)
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.duplicate_files, 1);
}

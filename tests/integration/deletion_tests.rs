use dupsweep::actions::DeleteConfig;
use dupsweep::duplicates::DuplicateFinder;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_commit_removes_only_copies() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), "same").unwrap();
    }
    fs::write(dir.path().join("d"), "diff").unwrap();

    let (mut ledger, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    let result = ledger.commit_deletions(&DeleteConfig::default());

    assert_eq!(result.success_count(), 2);
    assert_eq!(result.bytes_freed, summary.reclaimable_space);
    assert!(result.all_succeeded());
    assert!(ledger.is_empty());

    assert!(dir.path().join("a").exists());
    assert!(!dir.path().join("b").exists());
    assert!(!dir.path().join("c").exists());
    assert!(dir.path().join("d").exists());
}

#[test]
fn test_rescan_after_commit_finds_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    fs::write(dir.path().join("b"), "X").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let roots = [dir.path().to_path_buf()];
    let (mut ledger, _) = finder.find_duplicates(&roots).unwrap();
    ledger.commit_deletions(&DeleteConfig::permanent());

    let (ledger, summary) = finder.find_duplicates(&roots).unwrap();
    assert!(ledger.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_discard_keeps_every_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    fs::write(dir.path().join("b"), "X").unwrap();

    let (mut ledger, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    ledger.discard();

    assert!(ledger.is_empty());
    assert!(dir.path().join("a").exists());
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_commit_skips_copies_of_vanished_original() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    fs::write(dir.path().join("b"), "X").unwrap();

    let (mut ledger, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    fs::remove_file(dir.path().join("a")).unwrap();

    let result = ledger.commit_deletions(&DeleteConfig::default());

    assert_eq!(result.success_count(), 0);
    assert_eq!(result.failure_count(), 1);
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_commit_continues_when_a_copy_is_gone() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), "X").unwrap();
    }

    let (mut ledger, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    fs::remove_file(dir.path().join("b")).unwrap();

    let result = ledger.commit_deletions(&DeleteConfig::default());

    assert_eq!(result.success_count(), 1);
    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].0, dir.path().join("b"));
    assert!(!dir.path().join("c").exists());
    assert!(dir.path().join("a").exists());
}

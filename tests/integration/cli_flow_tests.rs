use clap::Parser;
use dupsweep::cli::Cli;
use dupsweep::config::Config;
use dupsweep::error::ExitCode;
use dupsweep::{execute, RunOptions};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::tempdir;

fn run_cli(args: &[&str], answer: &str) -> (anyhow::Result<dupsweep::RunReport>, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut config = Config::default();
    config.apply_cli(&cli);
    let options = RunOptions {
        delete: cli.delete,
        assume_yes: cli.yes,
    };

    let mut out = Vec::new();
    let mut input = Cursor::new(answer.as_bytes().to_vec());
    let result = execute(&cli.paths, &config, options, None, &mut out, &mut input);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_report_lists_original_then_copies() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    fs::write(dir.path().join("b"), "X").unwrap();
    fs::write(dir.path().join("c"), "Y").unwrap();
    let root = dir.path().to_str().unwrap();

    let (result, text) = run_cli(&["dupsweep", root], "");
    result.unwrap();

    let expected = format!(
        "Duplicate(s) of {} is at:\n{}\n\nTotal no of duplicates: 1\nTotal space taken by duplicates: 1 Bytes\n",
        dir.path().join("a").display(),
        dir.path().join("b").display()
    );
    assert_eq!(text, expected);
}

#[test]
fn test_delete_yes_removes_copies() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    fs::write(dir.path().join("b"), "X").unwrap();
    let root = dir.path().to_str().unwrap();

    let (result, text) = run_cli(&["dupsweep", "--delete", "--yes", root], "");
    let report = result.unwrap();

    assert!(text.contains("Deleted 1 file(s), freed 1 bytes"));
    assert_eq!(report.deleted.unwrap().success_count(), 1);
    assert!(!dir.path().join("b").exists());
}

#[test]
fn test_delete_prompt_declined() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "X").unwrap();
    fs::write(dir.path().join("b"), "X").unwrap();
    let root = dir.path().to_str().unwrap();

    let (result, text) = run_cli(&["dupsweep", "-d", root], "no\n");
    result.unwrap();

    assert!(text.contains("Delete 1 duplicate file(s)? [y/N]: "));
    assert!(text.contains("No files deleted."));
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_skip_empty_flag() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("e1"), "").unwrap();
    fs::write(dir.path().join("e2"), "").unwrap();
    let root = dir.path().to_str().unwrap();

    let (result, _) = run_cli(&["dupsweep", root], "");
    assert_eq!(result.unwrap().summary.duplicate_files, 1);

    let (result, _) = run_cli(&["dupsweep", "--skip-empty", root], "");
    assert_eq!(result.unwrap().summary.duplicate_files, 0);
}

#[test]
fn test_file_root_is_usage_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();

    let (result, text) = run_cli(&["dupsweep", file.to_str().unwrap()], "");
    let err = result.unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::UsageError);
    assert!(err.to_string().contains("Not a directory"));
    assert!(text.is_empty());
}

#[test]
fn test_missing_root_is_usage_error() {
    let missing = PathBuf::from("/nonexistent/dupsweep/root");
    let (result, _) = run_cli(&["dupsweep", missing.to_str().unwrap()], "");

    assert_eq!(
        ExitCode::for_error(&result.unwrap_err()),
        ExitCode::UsageError
    );
}

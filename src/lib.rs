//! dupsweep - duplicate file finder
//!
//! Finds files with identical content under one or more directory trees and
//! optionally removes every copy but the first one found.
//!
//! Detection narrows candidates in three tiers:
//! 1. exact byte size ([`duplicates::CandidateIndex`])
//! 2. xxHash64 of the first bytes of the file
//! 3. SHA-256 of the whole file
//!
//! Confirmed groups are collected in a [`duplicates::GroupLedger`], which can
//! be printed, committed (copies removed) or discarded.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::delete::{BatchDeleteResult, DeleteConfig};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, ScanSummary};
use crate::error::ExitCode;
use crate::output::report;
use crate::progress::{Progress, ProgressCallback};

/// What the user asked to happen after the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Offer to delete the copies
    pub delete: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
}

/// Outcome of one [`execute`] call.
#[derive(Debug)]
pub struct RunReport {
    /// Scan statistics
    pub summary: ScanSummary,
    /// Removal results, if the ledger was committed
    pub deleted: Option<BatchDeleteResult>,
}

/// Run the application from parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for bad configuration, bad roots, allocation failure or
/// a failed write to stdout.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if logging::init_logging(cli.verbose, cli.quiet).is_err() {
        log::debug!("Logger already installed");
    }

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    let config = config.validate()?;
    log::debug!("Effective configuration: {:?}", config);

    let options = RunOptions {
        delete: cli.delete,
        assume_yes: cli.yes,
    };
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));

    let stdout = io::stdout();
    let stdin = io::stdin();
    let report = execute(
        &cli.paths,
        &config,
        options,
        Some(progress),
        &mut stdout.lock(),
        &mut stdin.lock(),
    )?;

    if report.summary.has_errors() {
        log::warn!(
            "{} unreadable entries and {} failed hashes were skipped",
            report.summary.scan_errors.len(),
            report.summary.failed_hashes
        );
    }
    Ok(ExitCode::Success)
}

/// Scan `roots`, print the report to `out` and settle the ledger.
///
/// With `options.delete`, the user is asked on `out`/`input` before any copy
/// is removed, unless `options.assume_yes` is set. Answering `y` or `yes`
/// commits; anything else, including end of input, discards. Every file
/// that could not be deleted is listed on `out` with its reason.
///
/// # Errors
///
/// Returns the `FinderError` of a failed scan, or the I/O error of a failed
/// write to `out`.
pub fn execute<W: Write, R: BufRead>(
    roots: &[PathBuf],
    config: &Config,
    options: RunOptions,
    progress: Option<Arc<dyn ProgressCallback>>,
    out: &mut W,
    input: &mut R,
) -> Result<RunReport> {
    let mut finder_config = FinderConfig::default()
        .with_walker_config(config.walker_config())
        .with_prefix_bytes(config.prefix_bytes)
        .with_chunk_size(config.chunk_size);
    if let Some(callback) = progress {
        finder_config = finder_config.with_progress_callback(callback);
    }

    let (mut ledger, summary) = DuplicateFinder::new(finder_config).find_duplicates(roots)?;
    log::info!(
        "Scanned {} files ({}) in {:.2?}",
        summary.total_files,
        summary.total_size_display(),
        summary.scan_duration
    );

    ledger
        .print_report(out)
        .and_then(|()| {
            report::write_summary(out, summary.duplicate_files, summary.reclaimable_space)
        })
        .context("Failed to write report")?;

    let mut deleted = None;
    if options.delete && !ledger.is_empty() {
        let count = ledger.duplicate_count();
        let confirmed = options.assume_yes
            || confirm(out, input, count).context("Failed to read confirmation")?;
        if confirmed {
            let delete_config = if config.trash {
                DeleteConfig::trash()
            } else {
                DeleteConfig::permanent()
            };
            let result = ledger.commit_deletions(&delete_config);
            for (path, reason) in &result.failures {
                log::error!("Not deleted {}: {}", path.display(), reason);
                writeln!(out, "Not deleted {}: {}", path.display(), reason)
                    .context("Failed to write report")?;
            }
            writeln!(out, "{}", result.summary()).context("Failed to write report")?;
            deleted = Some(result);
        } else {
            ledger.discard();
            writeln!(out, "No files deleted.").context("Failed to write report")?;
        }
    } else {
        ledger.discard();
    }

    Ok(RunReport { summary, deleted })
}

/// Ask whether to delete `count` copies.
fn confirm<W: Write, R: BufRead>(out: &mut W, input: &mut R, count: usize) -> io::Result<bool> {
    write!(out, "Delete {count} duplicate file(s)? [y/N]: ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

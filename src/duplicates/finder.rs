//! Duplicate finder: walk, index, resolve.
//!
//! # Overview
//!
//! This module runs the whole detection pipeline for one set of roots:
//! 1. **Walk** - Collect every regular file under the roots
//! 2. **Index** - File each one under its exact size ([`CandidateIndex`])
//! 3. **Resolve** - Confirm duplicates with the weak and strong hashes
//!    ([`DuplicateResolver`]) and collect them in a [`GroupLedger`]
//!
//! Nothing is deleted here. The returned ledger decides that later.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_prefix_bytes(4096));
//! let (ledger, summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//!
//! println!("{} duplicate groups", ledger.group_count());
//! println!("Reclaimable: {}", summary.reclaimable_display());
//! ```

use std::collections::TryReserveError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::output::report::format_size;
use crate::progress::ProgressCallback;
use crate::scanner::{
    FileEntry, HashError, Hasher, ScanError, Walker, WalkerConfig, DEFAULT_CHUNK_SIZE,
    DEFAULT_PREFIX_BYTES,
};

use super::{CandidateIndex, DuplicateResolver, GroupLedger};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Bytes read from the head of each file for the weak hash.
    pub prefix_bytes: usize,
    /// Streaming chunk size for the strong hash.
    pub chunk_size: usize,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("prefix_bytes", &self.prefix_bytes)
            .field("chunk_size", &self.chunk_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            prefix_bytes: DEFAULT_PREFIX_BYTES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the weak-hash prefix length.
    #[must_use]
    pub fn with_prefix_bytes(mut self, bytes: usize) -> Self {
        self.prefix_bytes = bytes.max(1);
        self
    }

    /// Set the strong-hash chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files indexed
    pub total_files: usize,
    /// Total size of all indexed files in bytes
    pub total_size: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Number of hash attempts that failed and excluded a pair
    pub failed_hashes: usize,
    /// Traversal errors (unreadable directories, vanished entries)
    pub scan_errors: Vec<ScanError>,
    /// Recoverable hashing errors
    pub hash_errors: Vec<HashError>,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        format_size(self.reclaimable_space)
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        format_size(self.total_size)
    }

    /// Whether any file or directory could not be fully processed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || self.failed_hashes > 0
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A bookkeeping structure could not grow.
    #[error("Out of memory while storing {context}")]
    OutOfMemory {
        /// What was being stored
        context: &'static str,
        /// The failed reservation
        #[source]
        source: TryReserveError,
    },

    /// A fatal hashing error (allocation failure).
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl FinderError {
    /// Whether the error was caused by the paths the user supplied.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::PathNotFound(_) | Self::NotADirectory(_))
    }
}

/// Duplicate finder that runs the walk → index → resolve pipeline.
///
/// Each call starts from scratch and owns all of its state, so repeated scans
/// over an unchanged tree produce identical ledgers.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new()
            .with_prefix_bytes(config.prefix_bytes)
            .with_chunk_size(config.chunk_size);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under `roots`.
    ///
    /// Roots are walked in the order given; files found under an earlier
    /// root win the Original role over equal files found later. A root that
    /// repeats or overlaps another is walked once, so a file is never its
    /// own duplicate.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - A root does not exist or is not a directory
    /// - Memory for the index, the ledger or a hash buffer runs out
    ///
    /// Unreadable directories and files are recorded in the summary instead.
    pub fn find_duplicates(
        &self,
        roots: &[PathBuf],
    ) -> Result<(GroupLedger, ScanSummary), FinderError> {
        let start_time = Instant::now();

        for root in roots {
            if !root.exists() {
                return Err(FinderError::PathNotFound(root.clone()));
            }
            if !root.is_dir() {
                return Err(FinderError::NotADirectory(root.clone()));
            }
        }

        let walker = Walker::new(roots.to_vec(), self.config.walker_config.clone());
        log::info!(
            "Starting duplicate scan of {}",
            walker
                .roots()
                .iter()
                .map(|r| r.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        let mut index = CandidateIndex::new();
        let mut scan_errors = Vec::new();

        for result in walker.walk() {
            match result {
                Ok(file) => {
                    index.insert_entry(file)?;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(index.len(), "");
                    }
                }
                Err(e) => scan_errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }
        log::info!(
            "Walk complete: {} files, {} unreadable entries",
            index.len(),
            scan_errors.len()
        );

        let (ledger, mut summary) = self.resolve(index)?;
        summary.scan_errors = scan_errors;
        summary.scan_duration = start_time.elapsed();
        Ok((ledger, summary))
    }

    /// Find duplicates among an already collected list of files.
    ///
    /// Order in `files` is discovery order.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` on allocation failure.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(GroupLedger, ScanSummary), FinderError> {
        let start_time = Instant::now();

        let mut index = CandidateIndex::new();
        for file in files {
            index.insert_entry(file)?;
        }

        let (ledger, mut summary) = self.resolve(index)?;
        summary.scan_duration = start_time.elapsed();
        Ok((ledger, summary))
    }

    fn resolve(&self, mut index: CandidateIndex) -> Result<(GroupLedger, ScanSummary), FinderError> {
        let total_files = index.len();
        let total_size = index.total_size();

        let mut resolver = DuplicateResolver::new(self.hasher.clone());
        if let Some(ref callback) = self.config.progress_callback {
            resolver = resolver.with_progress_callback(callback.clone());
        }
        let (ledger, stats) = resolver.resolve(&mut index)?;

        let summary = ScanSummary {
            total_files,
            total_size,
            duplicate_groups: stats.duplicate_groups,
            duplicate_files: stats.duplicates,
            reclaimable_space: ledger.reclaimable_bytes(),
            failed_hashes: stats.failed_hashes,
            hash_errors: stats.errors,
            ..ScanSummary::default()
        };
        Ok((ledger, summary))
    }
}

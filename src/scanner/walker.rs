//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one or more
//! directory trees and yielding every regular file with its size.
//!
//! # Features
//!
//! - Roots walked in the order given, children sorted by file name, so the
//!   discovery order is reproducible between runs
//! - Symbolic links are never followed and never reported
//! - Unreadable directories are reported as [`ScanError`] and skipped
//! - Roots are made absolute; a root repeated or nested inside an earlier
//!   one is walked only once, so no file is reported twice
//! - Optional hidden-file and empty-file filtering
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(vec![PathBuf::from("/home/user/Downloads")], config);
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root paths to walk, in order
    roots: Vec<PathBuf>,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given roots.
    ///
    /// Roots are resolved with [`normalize_roots`].
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            roots: normalize_roots(&roots),
            config,
        }
    }

    /// Roots this walker will traverse, after normalization.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.'))
    }

    /// Walk every root and yield discovered files.
    ///
    /// Errors are yielded in-line and do not stop iteration; callers decide
    /// whether to log, collect or ignore them.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        self.roots
            .iter()
            .enumerate()
            .flat_map(move |(i, root)| self.walk_root(root, &self.roots[..i]))
    }

    /// Walk one root, pruning any earlier root that lies inside it.
    fn walk_root<'a>(
        &'a self,
        root: &'a Path,
        walked: &'a [PathBuf],
    ) -> impl Iterator<Item = Result<FileEntry, ScanError>> + 'a {
        log::debug!("Walking {}", root.display());

        let skip_hidden = self.config.skip_hidden;
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                !(skip_hidden && Self::is_hidden(entry))
                    && !(entry.depth() > 0 && walked.iter().any(|w| w == entry.path()))
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.handle_walk_error(root, e))),
            })
    }

    /// Turn a walkdir entry into a FileEntry if it is a regular file we keep.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }
        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                let path = entry.path().to_path_buf();
                let error = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
                log::warn!("Unable to stat {}: {}", path.display(), error);
                return Some(Err(ScanError::from_io(path, error)));
            }
        };

        let size = metadata.len();
        if size == 0 && self.config.skip_empty {
            log::debug!("Skipping empty file: {}", entry.path().display());
            return None;
        }

        Some(Ok(FileEntry::new(entry.path().to_path_buf(), size)))
    }

    /// Report a traversal error (typically an unreadable directory).
    fn handle_walk_error(&self, root: &Path, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        log::warn!("Unable to read {}: {}", path.display(), error);

        match error.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop detected"),
            },
        }
    }
}

/// Make roots absolute and drop repeats.
///
/// Each root is canonicalized (falling back to an absolute path if it cannot
/// be resolved). A root equal to, or inside, an earlier root is dropped;
/// order is otherwise kept.
#[must_use]
pub fn normalize_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut kept: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for root in roots {
        let resolved = std::fs::canonicalize(root)
            .or_else(|_| std::path::absolute(root))
            .unwrap_or_else(|_| root.clone());

        if let Some(outer) = kept.iter().find(|k| resolved.starts_with(k)) {
            log::info!(
                "Skipping root {}: already covered by {}",
                root.display(),
                outer.display()
            );
            continue;
        }
        kept.push(resolved);
    }
    kept
}

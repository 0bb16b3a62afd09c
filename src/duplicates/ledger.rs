//! Deferred deletion ledger.
//!
//! # Overview
//!
//! The resolver never deletes anything. Each confirmed duplicate group is
//! pushed onto a [`GroupLedger`] as one unit: its Copies first, then the
//! Original that marks the group. The ledger behaves like a stack (the most
//! recently confirmed group sits on top) and is only ever walked in full:
//!
//! - [`GroupLedger::print_report`] renders it without changing it
//! - [`GroupLedger::commit_deletions`] removes every Copy, then clears it
//! - [`GroupLedger::discard`] clears it without touching the filesystem
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::{FileRecord, GroupLedger};
//! use std::path::{Path, PathBuf};
//!
//! let mut ledger = GroupLedger::new();
//! ledger
//!     .record(
//!         FileRecord::new(PathBuf::from("/a"), 1),
//!         vec![FileRecord::new(PathBuf::from("/b"), 1)],
//!     )
//!     .unwrap();
//!
//! let group = ledger.groups().next().unwrap();
//! assert_eq!(group.original.path(), Path::new("/a"));
//! assert_eq!(group.copies.len(), 1);
//!
//! ledger.discard();
//! assert!(ledger.is_empty());
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::actions::delete::{delete_file, BatchDeleteResult, DeleteConfig, DeleteError};
use crate::output::report;

use super::{FileRecord, FinderError};

/// Role of a ledger entry within its duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The earliest-discovered file of the group; always kept.
    Original,
    /// A later file with identical content; deletion candidate.
    Copy,
}

/// A classified file owned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Whether the file is kept or a deletion candidate
    pub role: Role,
    /// The file itself
    pub record: FileRecord,
}

/// Borrowed view of one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup<'a> {
    /// The kept file
    pub original: &'a FileRecord,
    /// Deletion candidates, in discovery order
    pub copies: Vec<&'a FileRecord>,
}

impl DuplicateGroup<'_> {
    /// Bytes freed by removing every copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.copies.iter().map(|c| c.size()).sum()
    }
}

/// Ordered record of confirmed duplicate groups awaiting a decision.
#[derive(Debug, Default)]
pub struct GroupLedger {
    /// Bottom of the stack first; the top is the last element.
    entries: Vec<LedgerEntry>,
}

impl GroupLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one confirmed group: every Copy, then the Original marking it.
    ///
    /// Copies are given in discovery order. A group without copies is not a
    /// duplicate group and is ignored.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::OutOfMemory` if the ledger cannot grow. Nothing
    /// from the group is pushed in that case.
    pub fn record(
        &mut self,
        original: FileRecord,
        copies: Vec<FileRecord>,
    ) -> Result<(), FinderError> {
        if copies.is_empty() {
            log::debug!(
                "Ignoring group without copies: {}",
                original.path().display()
            );
            return Ok(());
        }

        self.entries
            .try_reserve(copies.len() + 1)
            .map_err(|source| FinderError::OutOfMemory {
                context: "ledger entry",
                source,
            })?;

        // Reversed so a top-down walk meets the Original, then its Copies
        // in discovery order.
        for copy in copies.into_iter().rev() {
            log::debug!(
                "Duplicate: {} is a copy of {}",
                copy.path().display(),
                original.path().display()
            );
            self.entries.push(LedgerEntry {
                role: Role::Copy,
                record: copy,
            });
        }
        self.entries.push(LedgerEntry {
            role: Role::Original,
            record: original,
        });
        Ok(())
    }

    /// Entries from the top of the stack down.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> + '_ {
        self.entries.iter().rev()
    }

    /// Groups from the most recently confirmed down.
    pub fn groups(&self) -> impl Iterator<Item = DuplicateGroup<'_>> + '_ {
        let mut top_down = self.entries().peekable();
        std::iter::from_fn(move || {
            let original = loop {
                let entry = top_down.next()?;
                if entry.role == Role::Original {
                    break &entry.record;
                }
                log::error!(
                    "Ledger copy without an original: {}",
                    entry.record.path().display()
                );
            };

            let mut copies = Vec::new();
            while let Some(entry) = top_down.next_if(|e| e.role == Role::Copy) {
                copies.push(&entry.record);
            }
            Some(DuplicateGroup { original, copies })
        })
    }

    /// Number of duplicate groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.role == Role::Original)
            .count()
    }

    /// Number of Copy entries (deletion candidates).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.entries.iter().filter(|e| e.role == Role::Copy).count()
    }

    /// Bytes reclaimable by removing every Copy.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.role == Role::Copy)
            .map(|e| e.record.size())
            .sum()
    }

    /// Number of entries (Originals and Copies).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every group to `out`, top of the stack first.
    ///
    /// Printing never changes the ledger and can be repeated.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the writer.
    pub fn print_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for group in self.groups() {
            report::write_group(out, &group)?;
        }
        Ok(())
    }

    /// Remove every Copy from disk, then clear the ledger.
    ///
    /// Originals are never touched. A failure on one file is recorded and the
    /// loop moves on; files already removed stay removed. Copies whose
    /// Original has disappeared since the scan are skipped, so the last
    /// surviving copy of some content is never the one deleted. A Copy that
    /// resolves to the same file as its Original is kept as well.
    pub fn commit_deletions(&mut self, config: &DeleteConfig) -> BatchDeleteResult {
        let mut result = BatchDeleteResult::default();
        let mut original: Option<&Path> = None;

        for entry in self.entries.iter().rev() {
            let path = entry.record.path();
            match (entry.role, original) {
                (Role::Original, _) => {
                    original = Some(path).filter(|p| p.exists());
                    if original.is_none() {
                        log::warn!(
                            "Original vanished since scan, keeping its copies: {}",
                            path.display()
                        );
                    }
                }
                (Role::Copy, None) => {
                    let reason = DeleteError::OriginalMissing(path.to_path_buf());
                    Self::keep_copy(reason, &mut result);
                }
                (Role::Copy, Some(kept)) if is_same_file(path, kept) => {
                    let reason = DeleteError::SameAsOriginal(path.to_path_buf());
                    Self::keep_copy(reason, &mut result);
                }
                (Role::Copy, Some(_)) => Self::delete_copy(path, config, &mut result),
            }
        }

        log::info!("{}", result.summary());
        self.entries.clear();
        result
    }

    fn keep_copy(reason: DeleteError, result: &mut BatchDeleteResult) {
        log::debug!("Keeping {}", reason);
        result
            .failures
            .push((reason.path().to_path_buf(), reason.to_string()));
    }

    fn delete_copy(path: &Path, config: &DeleteConfig, result: &mut BatchDeleteResult) {
        match delete_file(path, config) {
            Ok(deleted) => {
                result.bytes_freed += deleted.size;
                result.successes.push(deleted);
            }
            Err(e) => {
                log::debug!("Unable to remove file {}: {}", path.display(), e);
                result.failures.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    /// Clear the ledger without touching the filesystem.
    pub fn discard(&mut self) {
        log::debug!("Discarding {} ledger entries", self.entries.len());
        self.entries.clear();
    }
}

/// Whether two paths name the same file, directly or after resolving links
/// and relative components.
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

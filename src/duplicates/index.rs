//! Size-keyed candidate index.
//!
//! # Overview
//!
//! Files can only be duplicates if their sizes match exactly, so every
//! discovered file is filed under its byte size first. Buckets are drained
//! one at a time by the resolver; nothing is hashed here.
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::CandidateIndex;
//! use std::path::PathBuf;
//!
//! let mut index = CandidateIndex::new();
//! index.insert(PathBuf::from("/a.txt"), 100).unwrap();
//! index.insert(PathBuf::from("/b.txt"), 100).unwrap();
//! index.insert(PathBuf::from("/c.txt"), 200).unwrap();
//!
//! assert_eq!(index.len(), 3);
//! assert_eq!(index.candidate_buckets(), 1);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::scanner::{Digest, FileEntry};

use super::FinderError;

/// A discovered file and its lazily computed digests.
///
/// The path and size are fixed at discovery. Each digest is written at most
/// once and then reused for every later comparison in the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    size: u64,
    weak_hash: Option<u64>,
    strong_hash: Option<Digest>,
}

impl FileRecord {
    /// Create a record with no digests computed yet.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            weak_hash: None,
            strong_hash: None,
        }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes at discovery time.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Cached weak hash, if it has been computed.
    #[must_use]
    pub fn weak_hash(&self) -> Option<u64> {
        self.weak_hash
    }

    /// Cached strong hash, if it has been computed.
    #[must_use]
    pub fn strong_hash(&self) -> Option<&Digest> {
        self.strong_hash.as_ref()
    }

    /// Return the cached weak hash or compute and cache it.
    ///
    /// A failed computation leaves the cache empty so it can be retried.
    pub(crate) fn weak_hash_or_try_insert_with<E>(
        &mut self,
        compute: impl FnOnce(&Path) -> Result<u64, E>,
    ) -> Result<u64, E> {
        if let Some(hash) = self.weak_hash {
            return Ok(hash);
        }
        let hash = compute(&self.path)?;
        self.weak_hash = Some(hash);
        Ok(hash)
    }

    /// Return the cached strong hash or compute and cache it.
    pub(crate) fn strong_hash_or_try_insert_with<E>(
        &mut self,
        compute: impl FnOnce(&Path) -> Result<Digest, E>,
    ) -> Result<Digest, E> {
        if let Some(hash) = self.strong_hash {
            return Ok(hash);
        }
        let hash = compute(&self.path)?;
        self.strong_hash = Some(hash);
        Ok(hash)
    }
}

impl From<FileEntry> for FileRecord {
    fn from(entry: FileEntry) -> Self {
        Self::new(entry.path, entry.size)
    }
}

/// Files grouped by exact size, in discovery order within each bucket.
///
/// Buckets iterate in ascending size order, which keeps every run over the
/// same input reproducible.
#[derive(Debug, Default)]
pub struct CandidateIndex {
    buckets: BTreeMap<u64, Vec<FileRecord>>,
    files: usize,
}

impl CandidateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a discovered file under its size.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::OutOfMemory` if the bucket cannot grow.
    pub fn insert(&mut self, path: PathBuf, size: u64) -> Result<(), FinderError> {
        let bucket = self.buckets.entry(size).or_default();
        bucket
            .try_reserve(1)
            .map_err(|source| FinderError::OutOfMemory {
                context: "file record",
                source,
            })?;
        bucket.push(FileRecord::new(path, size));
        self.files += 1;
        Ok(())
    }

    /// Record a walker entry.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::OutOfMemory` if the bucket cannot grow.
    pub fn insert_entry(&mut self, entry: FileEntry) -> Result<(), FinderError> {
        self.insert(entry.path, entry.size)
    }

    /// All populated buckets, smallest size first.
    pub fn buckets(&self) -> impl Iterator<Item = (u64, &[FileRecord])> + '_ {
        self.buckets
            .iter()
            .map(|(size, records)| (*size, records.as_slice()))
    }

    /// Move every bucket out of the index, smallest size first.
    pub fn drain(&mut self) -> impl Iterator<Item = (u64, Vec<FileRecord>)> {
        self.files = 0;
        std::mem::take(&mut self.buckets).into_iter()
    }

    /// Number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files
    }

    /// Whether the index holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files == 0
    }

    /// Total bytes across all indexed files.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.buckets
            .iter()
            .map(|(size, records)| size * records.len() as u64)
            .sum()
    }

    /// Number of buckets that could contain duplicates (2+ files).
    #[must_use]
    pub fn candidate_buckets(&self) -> usize {
        self.buckets.values().filter(|r| r.len() > 1).count()
    }

    /// Number of files sitting in buckets of 2+ files.
    #[must_use]
    pub fn candidate_files(&self) -> usize {
        self.buckets
            .values()
            .filter(|r| r.len() > 1)
            .map(Vec::len)
            .sum()
    }
}

impl FromIterator<FileEntry> for CandidateIndex {
    /// Build an index from walker output.
    ///
    /// Allocation failure aborts here; use [`CandidateIndex::insert`] to
    /// observe it as an error instead.
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        let mut index = Self::new();
        for entry in iter {
            index.buckets.entry(entry.size).or_default().push(entry.into());
            index.files += 1;
        }
        index
    }
}

//! Pairwise duplicate confirmation within size buckets.
//!
//! # Overview
//!
//! For every bucket of two or more same-size files, each surviving file is
//! compared with every later one:
//!
//! 1. **Weak hash**: xxHash64 of the file head. Unequal → not a duplicate.
//!    A file whose head cannot be read makes the pair inconclusive.
//! 2. **Strong hash**: SHA-256 of the whole file. Equal → confirmed.
//!
//! The earlier file of a confirmed pair is the Original and the later one a
//! Copy. A Copy takes no further part in its bucket, so groups never chain.
//! Digests are cached on the record, so each file is hashed at most once per
//! stage no matter how many pairs it is part of.
//!
//! I/O failures stay local to the pair. Allocation failure aborts the pass.

use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::scanner::{hash_to_hex, Digest, HashError, HashProvider};

use super::{CandidateIndex, FileRecord, FinderError, GroupLedger};

/// Counters from one resolve pass.
#[derive(Debug, Default)]
pub struct ResolveStats {
    /// Files visited, including those in single-file buckets
    pub files_checked: usize,
    /// Buckets that held 2+ files
    pub buckets_compared: usize,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Confirmed copies (files beyond the original in each group)
    pub duplicates: usize,
    /// Bytes held by confirmed copies
    pub reclaimable_bytes: u64,
    /// Hash attempts that failed with an I/O error
    pub failed_hashes: usize,
    /// The recoverable errors behind `failed_hashes`
    pub errors: Vec<HashError>,
}

impl ResolveStats {
    fn record_failure(&mut self, error: HashError) {
        self.failed_hashes += 1;
        self.errors.push(error);
    }
}

/// Confirms duplicates bucket by bucket and hands them to a [`GroupLedger`].
///
/// # Example
///
/// ```no_run
/// use dupsweep::duplicates::{CandidateIndex, DuplicateResolver};
/// use dupsweep::scanner::Hasher;
/// use std::path::PathBuf;
///
/// let mut index = CandidateIndex::new();
/// index.insert(PathBuf::from("/tmp/a"), 1).unwrap();
/// index.insert(PathBuf::from("/tmp/b"), 1).unwrap();
///
/// let resolver = DuplicateResolver::new(Hasher::new());
/// let (ledger, stats) = resolver.resolve(&mut index).unwrap();
/// println!("{} duplicates in {} groups", stats.duplicates, ledger.group_count());
/// ```
pub struct DuplicateResolver<H> {
    hasher: H,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl<H: HashProvider> DuplicateResolver<H> {
    /// Create a resolver using the given hash provider.
    #[must_use]
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Drain `index` and return the ledger of confirmed groups.
    ///
    /// # Errors
    ///
    /// Returns an error only for allocation failure, which aborts the pass.
    /// Records not yet moved into the ledger are dropped with it.
    pub fn resolve(
        &self,
        index: &mut CandidateIndex,
    ) -> Result<(GroupLedger, ResolveStats), FinderError> {
        let mut ledger = GroupLedger::new();
        let mut stats = ResolveStats::default();
        let total = index.len();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("check", total);
        }
        log::info!(
            "Checking {} files ({} in same-size buckets)",
            total,
            index.candidate_files()
        );

        for (size, records) in index.drain() {
            self.resolve_bucket(size, records, &mut ledger, &mut stats)?;
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("check");
        }
        log::info!(
            "Check complete: {} groups, {} duplicates, {} bytes reclaimable",
            stats.duplicate_groups,
            stats.duplicates,
            stats.reclaimable_bytes
        );

        Ok((ledger, stats))
    }

    fn resolve_bucket(
        &self,
        size: u64,
        mut records: Vec<FileRecord>,
        ledger: &mut GroupLedger,
        stats: &mut ResolveStats,
    ) -> Result<(), FinderError> {
        let n = records.len();
        if n < 2 {
            for record in &records {
                self.report_progress(stats, record);
            }
            return Ok(());
        }

        stats.buckets_compared += 1;
        log::debug!("Comparing {} files of {} bytes", n, size);

        let mut is_copy = vec![false; n];
        let mut copies_of: Vec<Vec<usize>> = vec![Vec::new(); n];

        for i in 0..n {
            self.report_progress(stats, &records[i]);
            if is_copy[i] {
                continue;
            }
            for j in (i + 1)..n {
                if is_copy[j] {
                    continue;
                }
                let (head, tail) = records.split_at_mut(j);
                let (outer, inner) = (&mut head[i], &mut tail[0]);
                if self.is_duplicate(outer, inner, stats)? {
                    is_copy[j] = true;
                    copies_of[i].push(j);
                    stats.duplicates += 1;
                    stats.reclaimable_bytes += inner.size();
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_message(&format!("{} duplicates found", stats.duplicates));
                    }
                }
            }
        }

        let mut slots: Vec<Option<FileRecord>> = records.into_iter().map(Some).collect();
        for (i, copy_indices) in copies_of.into_iter().enumerate() {
            if copy_indices.is_empty() {
                continue;
            }
            let Some(original) = slots[i].take() else {
                continue;
            };
            let copies = copy_indices
                .into_iter()
                .filter_map(|j| slots[j].take())
                .collect();
            ledger.record(original, copies)?;
            stats.duplicate_groups += 1;
        }
        Ok(())
    }

    fn report_progress(&self, stats: &mut ResolveStats, record: &FileRecord) {
        stats.files_checked += 1;
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(
                stats.files_checked,
                record.path().to_string_lossy().as_ref(),
            );
        }
    }

    /// Decide whether `inner` is a copy of `outer`.
    fn is_duplicate(
        &self,
        outer: &mut FileRecord,
        inner: &mut FileRecord,
        stats: &mut ResolveStats,
    ) -> Result<bool, FinderError> {
        if outer.size() != inner.size() {
            return Ok(false);
        }

        let weak_outer = self.weak_hash(outer, stats)?;
        let weak_inner = self.weak_hash(inner, stats)?;
        let (Some(weak_outer), Some(weak_inner)) = (weak_outer, weak_inner) else {
            return Ok(false);
        };
        if weak_outer != weak_inner {
            log::trace!(
                "Weak hash mismatch: {} / {}",
                outer.path().display(),
                inner.path().display()
            );
            return Ok(false);
        }

        let Some(strong_outer) = self.strong_hash(outer, stats)? else {
            return Ok(false);
        };
        let Some(strong_inner) = self.strong_hash(inner, stats)? else {
            return Ok(false);
        };

        let matched = strong_outer == strong_inner;
        log::trace!(
            "Strong hash {}: {} / {}",
            if matched { "match" } else { "mismatch" },
            outer.path().display(),
            inner.path().display()
        );
        if matched {
            log::debug!(
                "Confirmed duplicate {} ({})",
                inner.path().display(),
                hash_to_hex(&strong_inner)
            );
        }
        Ok(matched)
    }

    /// Cached or freshly computed weak hash; `None` if the file is unreadable.
    fn weak_hash(
        &self,
        record: &mut FileRecord,
        stats: &mut ResolveStats,
    ) -> Result<Option<u64>, FinderError> {
        match record.weak_hash_or_try_insert_with(|path| self.hasher.weak_hash(path)) {
            Ok(hash) => Ok(Some(hash)),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                log::warn!("Excluding from comparison: {}", e);
                stats.record_failure(e);
                Ok(None)
            }
        }
    }

    /// Cached or freshly computed strong hash; `None` if the file is unreadable.
    fn strong_hash(
        &self,
        record: &mut FileRecord,
        stats: &mut ResolveStats,
    ) -> Result<Option<Digest>, FinderError> {
        match record.strong_hash_or_try_insert_with(|path| self.hasher.strong_hash(path)) {
            Ok(hash) => Ok(Some(hash)),
            Err(e) if e.is_fatal() => {
                log::error!("{}", e);
                Err(e.into())
            }
            Err(e) => {
                log::warn!("Excluding from comparison: {}", e);
                stats.record_failure(e);
                Ok(None)
            }
        }
    }
}

//! Duplicate detection module.
//!
//! This module provides:
//! - [`CandidateIndex`]: size buckets of discovered files
//! - [`DuplicateResolver`]: weak/strong hash confirmation within a bucket
//! - [`GroupLedger`]: confirmed groups awaiting print, commit or discard
//! - [`DuplicateFinder`]: the walk → index → resolve pipeline

pub mod finder;
pub mod index;
pub mod ledger;
pub mod resolver;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use index::{CandidateIndex, FileRecord};
pub use ledger::{DuplicateGroup, GroupLedger, LedgerEntry, Role};
pub use resolver::{DuplicateResolver, ResolveStats};

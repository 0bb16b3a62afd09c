//! Console output for scan results.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::DuplicateFinder;
//! use dupsweep::output::report;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (ledger, summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//!
//! let mut out = std::io::stdout().lock();
//! ledger.print_report(&mut out).unwrap();
//! report::write_summary(&mut out, summary.duplicate_files, summary.reclaimable_space).unwrap();
//! ```

pub mod report;

pub use report::{format_size, write_group, write_summary};

//! Plain-text duplicate report.
//!
//! Each group is a header naming the Original, one line per Copy and a blank
//! separator line:
//!
//! ```text
//! Duplicate(s) of /photos/a.jpg is at:
//! /photos/backup/a.jpg
//! /old/a.jpg
//!
//! ```
//!
//! The run ends with a two-line summary of the duplicate count and the space
//! they take up.

use std::io::{self, Write};

use crate::duplicates::DuplicateGroup;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Write one duplicate group.
///
/// # Errors
///
/// Returns any error raised by the writer.
pub fn write_group<W: Write + ?Sized>(out: &mut W, group: &DuplicateGroup<'_>) -> io::Result<()> {
    writeln!(out, "Duplicate(s) of {} is at:", group.original.path().display())?;
    for copy in &group.copies {
        writeln!(out, "{}", copy.path().display())?;
    }
    writeln!(out)
}

/// Write the closing totals.
///
/// # Errors
///
/// Returns any error raised by the writer.
pub fn write_summary<W: Write + ?Sized>(
    out: &mut W,
    duplicates: usize,
    bytes: u64,
) -> io::Result<()> {
    writeln!(out, "Total no of duplicates: {duplicates}")?;
    writeln!(out, "Total space taken by duplicates: {}", format_size(bytes))
}

/// Scale a byte count to Bytes, KB, MB or GB (base 1024).
#[must_use]
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let scaled = |unit: u64| bytes as f64 / unit as f64;

    if bytes >= GB {
        format!("{:.2} GB", scaled(GB))
    } else if bytes >= MB {
        format!("{:.2} MB", scaled(MB))
    } else if bytes >= KB {
        format!("{:.2} KB", scaled(KB))
    } else {
        format!("{bytes} Bytes")
    }
}

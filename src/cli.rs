//! Command-line interface definitions for dupsweep.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under two trees
//! dupsweep ~/Pictures /mnt/backup/Pictures
//!
//! # Report, then ask before removing every copy
//! dupsweep --delete ~/Downloads
//!
//! # Move copies to the trash without asking
//! dupsweep --delete --yes --trash ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find duplicate files and optionally remove the copies.
///
/// Files are compared by size, then by a hash of their first bytes, then by a
/// SHA-256 of their whole content. In every duplicate group the first file
/// found is kept; the rest are reported and, with --delete, removed.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan, walked in the order given
    #[arg(value_name = "DIR", required = true)]
    pub paths: Vec<PathBuf>,

    /// Offer to delete the copies after the report
    #[arg(short, long)]
    pub delete: bool,

    /// Delete without asking (with --delete)
    #[arg(short = 'y', long, requires = "delete")]
    pub yes: bool,

    /// Move copies to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Skip zero-byte files
    #[arg(long)]
    pub skip_empty: bool,

    /// Bytes read from the head of each file for the quick hash (e.g. 2048, 4KiB)
    #[arg(long, value_name = "N", value_parser = parse_byte_count)]
    pub prefix_bytes: Option<usize>,

    /// Configuration file (TOML)
    ///
    /// If not specified, a default platform-specific path is used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Parse a positive byte count.
///
/// Accepts a plain number or one with a binary suffix (B, KiB/K, MiB/M).
/// Case-insensitive.
///
/// # Examples
///
/// ```
/// use dupsweep::cli::parse_byte_count;
///
/// assert_eq!(parse_byte_count("2048").unwrap(), 2048);
/// assert_eq!(parse_byte_count("4KiB").unwrap(), 4096);
/// assert_eq!(parse_byte_count("1M").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, not a whole number, zero, or has
/// an unknown suffix.
pub fn parse_byte_count(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: usize = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: usize = match suffix.as_str() {
        "" | "B" => 1,
        "K" | "KIB" => 1 << 10,
        "M" | "MIB" => 1 << 20,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    match num.checked_mul(multiplier) {
        Some(0) => Err("Size must be greater than zero".to_string()),
        Some(bytes) => Ok(bytes),
        None => Err(format!("Size too large: '{s}'")),
    }
}

//! File hashing for duplicate confirmation.
//!
//! # Overview
//!
//! Two digests are computed, each at most once per file and run:
//! - **Weak hash**: xxHash64 (seed 0) over the first [`DEFAULT_PREFIX_BYTES`]
//!   bytes. Cheap rejection of same-size files with different heads.
//! - **Strong hash**: SHA-256 over the whole file, streamed in bounded chunks.
//!
//! Files that differ only after the prefix still pass the weak stage; the
//! strong stage is what decides.

use std::fs::File;
use std::hash::Hasher as _;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest as _, Sha256};
use twox_hash::XxHash64;

use super::HashError;

/// Length of a strong digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Strong content digest.
pub type Digest = [u8; DIGEST_LEN];

/// Bytes read from the head of a file for the weak hash.
pub const DEFAULT_PREFIX_BYTES: usize = 2048;

/// Streaming chunk size for the strong hash (256 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

const WEAK_SEED: u64 = 0;

/// Source of the two digests used by the resolver.
///
/// `Hasher` is the production implementation; tests substitute their own.
pub trait HashProvider {
    /// Fast non-cryptographic hash of a bounded prefix of the file.
    ///
    /// # Errors
    ///
    /// Returns a `HashError` if the file cannot be opened or read.
    fn weak_hash(&self, path: &Path) -> Result<u64, HashError>;

    /// Cryptographic hash of the whole file.
    ///
    /// # Errors
    ///
    /// Returns an I/O flavoured `HashError` on open/read failure and
    /// `HashError::OutOfMemory` if the scratch buffer cannot be allocated.
    fn strong_hash(&self, path: &Path) -> Result<Digest, HashError>;
}

/// Production hasher: xxHash64 prefix + streamed SHA-256.
#[derive(Debug, Clone)]
pub struct Hasher {
    prefix_bytes: usize,
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default prefix and chunk sizes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix_bytes: DEFAULT_PREFIX_BYTES,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the number of leading bytes covered by the weak hash.
    #[must_use]
    pub fn with_prefix_bytes(mut self, bytes: usize) -> Self {
        self.prefix_bytes = bytes.max(1);
        self
    }

    /// Set the strong-hash streaming chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Number of leading bytes covered by the weak hash.
    #[must_use]
    pub fn prefix_bytes(&self) -> usize {
        self.prefix_bytes
    }

    /// Strong-hash streaming chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn open(path: &Path) -> Result<File, HashError> {
        File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))
    }
}

impl HashProvider for Hasher {
    fn weak_hash(&self, path: &Path) -> Result<u64, HashError> {
        let file = Self::open(path)?;

        let mut prefix = Vec::with_capacity(self.prefix_bytes);
        file.take(self.prefix_bytes as u64)
            .read_to_end(&mut prefix)
            .map_err(|e| HashError::from_io(path.to_path_buf(), e))?;

        let mut hasher = XxHash64::with_seed(WEAK_SEED);
        hasher.write(&prefix);
        let hash = hasher.finish();

        log::trace!("Weak hash {:016x}: {}", hash, path.display());
        Ok(hash)
    }

    fn strong_hash(&self, path: &Path) -> Result<Digest, HashError> {
        let mut file = Self::open(path)?;

        let mut buffer: Vec<u8> = Vec::new();
        buffer
            .try_reserve_exact(self.chunk_size)
            .map_err(|source| HashError::OutOfMemory {
                path: path.to_path_buf(),
                source,
            })?;
        buffer.resize(self.chunk_size, 0);

        let mut sha = Sha256::new();
        loop {
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
            };
            sha.update(&buffer[..n]);
        }

        let digest: Digest = sha.finalize().into();
        log::trace!("Strong hash {}: {}", hash_to_hex(&digest), path.display());
        Ok(digest)
    }
}

/// Render a digest as lowercase hex.
#[must_use]
pub fn hash_to_hex(hash: &Digest) -> String {
    use std::fmt::Write as _;

    hash.iter().fold(String::with_capacity(DIGEST_LEN * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing a content
//! [`Fingerprint`] of a file using a fixed-size read buffer. The file handle
//! lives only for the duration of one call, so two hashers running side by
//! side never hold more than one descriptor each.
//!
//! # Example
//!
//! ```no_run
//! use dirmatch::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let (fingerprint, bytes) = hasher.fingerprint(Path::new("photo.jpg")).unwrap();
//! println!("{} ({} bytes)", fingerprint, bytes);
//! ```

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Serialize, Serializer};

use super::HashError;

/// Length of a fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// Read buffer size for streaming file content.
const BUFFER_SIZE: usize = 64 * 1024;

/// Digest of a file's full byte content.
///
/// Equal fingerprints are treated as equal content; no byte-level
/// verification follows a match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Fingerprint an in-memory byte slice.
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Lowercase hexadecimal form (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }

    /// Short prefix for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Streaming BLAKE3 hasher for file content.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    buffer_size: usize,
}

impl Hasher {
    /// Create a hasher with the default 64 KiB read buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(size: usize) -> Self {
        Self {
            buffer_size: size.max(1),
        }
    }

    /// Compute the fingerprint of the file's full content.
    ///
    /// The file is opened, streamed to the end and closed before returning.
    /// Also returns the number of bytes actually read, which can differ from
    /// the size seen at listing time if the file changed in between.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn fingerprint(&self, path: &Path) -> Result<(Fingerprint, u64), HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size.max(1)];
        let mut total = 0u64;

        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            hasher.update(&buffer[..read]);
            total += read as u64;
        }

        Ok((Fingerprint(*hasher.finalize().as_bytes()), total))
    }
}

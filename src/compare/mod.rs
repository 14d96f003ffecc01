//! Content-based comparison of two directory trees.
//!
//! This module provides functionality for:
//! - Per-side fingerprinting with intra-side duplicate detection
//! - Pure set partitioning into common / left-only / right-only
//! - The [`Comparator`] that runs the whole pipeline
//!
//! # Pipeline
//!
//! 1. **Listing** - walk each root (left, then right)
//! 2. **Filtering** - drop paths matching the optional pattern
//! 3. **Hashing** - fingerprint both sides concurrently (fork-join)
//! 4. **Comparing** - partition the two canonical maps
//!
//! # Example
//!
//! ```no_run
//! use dirmatch::compare::{Comparator, CompareConfig};
//! use std::path::Path;
//!
//! let comparator = Comparator::new(CompareConfig::default());
//! let result = comparator.compare(Path::new("backup"), Path::new("photos")).unwrap();
//! println!("{} files only in backup", result.left_only.len());
//! ```

pub mod engine;
pub mod hashing;
pub mod partition;
pub mod result;

use std::path::PathBuf;

pub use engine::{compare, validate_roots, CompareConfig, Comparator};
pub use hashing::{hash_side, CanonicalMap, DuplicateRecord, SideHashes};
pub use partition::{partition, CommonPair, SetPartition};
pub use result::{
    format_common, format_duplicate, format_unique, Classification, ComparisonResult,
    ComparisonSummary,
};

use crate::scanner::{HashError, ScanError};

/// Caller mistakes rejected before any scanning starts.
#[derive(thiserror::Error, Debug)]
pub enum UsageError {
    /// A root directory does not exist.
    #[error("{side} folder does not exist: {path}")]
    MissingRoot {
        /// Which side was given
        side: crate::progress::Side,
        /// The path as given
        path: PathBuf,
    },

    /// A root exists but is not a directory.
    #[error("{side} folder is not a directory: {path}")]
    NotADirectory {
        /// Which side was given
        side: crate::progress::Side,
        /// The path as given
        path: PathBuf,
    },

    /// Both roots resolve to the same directory.
    #[error("Please select two different folders: {0}")]
    SameRoot(PathBuf),

    /// The exclusion pattern does not parse.
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Parser error
        #[source]
        source: regex::Error,
    },
}

/// Errors that abort a comparison. No partial result is ever returned.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// Bad arguments, detected before any work.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// A path disappeared while listing or hashing.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A directory or file could not be read.
    #[error("Cannot read {path}: {source}")]
    Access {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The comparison was canceled (Ctrl+C or shutdown flag).
    #[error("Comparison canceled")]
    Canceled,
}

impl From<ScanError> for CompareError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(path) | ScanError::NotADirectory(path) => Self::NotFound(path),
            ScanError::PermissionDenied(path) => Self::Access {
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                path,
            },
            ScanError::Io { path, source } => Self::Access { path, source },
            ScanError::Interrupted => Self::Canceled,
        }
    }
}

impl From<HashError> for CompareError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::NotFound(path) => Self::NotFound(path),
            HashError::PermissionDenied(path) => Self::Access {
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                path,
            },
            HashError::Io { path, source } => Self::Access { path, source },
        }
    }
}

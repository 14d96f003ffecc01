//! Comparison pipeline orchestrator.
//!
//! # Overview
//!
//! [`Comparator`] is the only component that knows the pipeline order:
//!
//! 1. **Listing** - walk the left root, then the right root
//! 2. **Filtering** - apply the optional exclusion pattern to each side
//! 3. **Hashing** - fingerprint both sides concurrently with `rayon::join`
//! 4. **Comparing** - partition the two canonical maps
//!
//! The hashing workers share nothing but the progress sink. Their canonical
//! maps are only read after both have finished.
//!
//! # Example
//!
//! ```no_run
//! use dirmatch::compare::{Comparator, CompareConfig};
//! use dirmatch::scanner::PathFilter;
//! use std::path::Path;
//!
//! let config = CompareConfig::default()
//!     .with_filter(PathFilter::new(r"\.tmp$").unwrap());
//! let result = Comparator::new(config)
//!     .compare(Path::new("left"), Path::new("right"))
//!     .unwrap();
//!
//! for pair in &result.common {
//!     println!("{} == {}", pair.left.path.display(), pair.right.path.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::{
    hash_side, partition, CompareError, ComparisonResult, ComparisonSummary, SideHashes,
    UsageError,
};
use crate::progress::{NoopSink, Phase, ProgressEvent, ProgressSink, Side};
use crate::scanner::{FileHandle, Hasher, PathFilter, Walker, WalkerConfig};

/// Configuration for one comparison.
#[derive(Clone, Default)]
pub struct CompareConfig {
    /// Optional exclusion pattern applied to both sides.
    pub filter: Option<PathFilter>,
    /// Walker configuration shared by both sides.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for cancellation.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress sink.
    pub progress: Option<Arc<dyn ProgressSink>>,
}

impl std::fmt::Debug for CompareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareConfig")
            .field("filter", &self.filter.as_ref().map(PathFilter::as_str))
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field("progress", &self.progress.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

impl CompareConfig {
    /// Set the exclusion filter.
    #[must_use]
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Compile and set the exclusion pattern, if any.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::InvalidPattern`] if the pattern does not parse.
    pub fn with_pattern(mut self, pattern: Option<&str>) -> Result<Self, UsageError> {
        self.filter = match pattern {
            Some(p) if !p.is_empty() => {
                Some(PathFilter::new(p).map_err(|source| UsageError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })?)
            }
            _ => None,
        };
        Ok(self)
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for cancellation.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress sink.
    #[must_use]
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Check both roots before any work starts.
///
/// Both must exist, be directories and resolve to different paths.
///
/// # Errors
///
/// Returns the first [`UsageError`] found.
pub fn validate_roots(left: &Path, right: &Path) -> Result<(PathBuf, PathBuf), UsageError> {
    let left = canonical_root(left, Side::Left)?;
    let right = canonical_root(right, Side::Right)?;
    if left == right {
        return Err(UsageError::SameRoot(left));
    }
    Ok((left, right))
}

fn canonical_root(path: &Path, side: Side) -> Result<PathBuf, UsageError> {
    if !path.exists() {
        return Err(UsageError::MissingRoot {
            side,
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(UsageError::NotADirectory {
            side,
            path: path.to_path_buf(),
        });
    }
    std::fs::canonicalize(path).map_err(|_| UsageError::MissingRoot {
        side,
        path: path.to_path_buf(),
    })
}

/// Runs the full comparison pipeline.
pub struct Comparator {
    config: CompareConfig,
    hasher: Hasher,
}

impl Comparator {
    /// Create a comparator with the given configuration.
    #[must_use]
    pub fn new(config: CompareConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a comparator with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(CompareConfig::default())
    }

    fn sink(&self) -> &dyn ProgressSink {
        match self.config.progress.as_deref() {
            Some(sink) => sink,
            None => &NoopSink,
        }
    }

    fn check_canceled(&self) -> Result<(), CompareError> {
        if self.config.is_shutdown_requested() {
            log::info!("Comparison canceled");
            return Err(CompareError::Canceled);
        }
        Ok(())
    }

    /// Compare two directory trees by content.
    ///
    /// # Errors
    ///
    /// - [`CompareError::Usage`] if the roots are invalid (checked first)
    /// - [`CompareError::NotFound`] / [`CompareError::Access`] on any
    ///   unreadable directory or file
    /// - [`CompareError::Canceled`] if the shutdown flag was raised
    pub fn compare(&self, left: &Path, right: &Path) -> Result<ComparisonResult, CompareError> {
        let start_time = Instant::now();
        let (left_root, right_root) = validate_roots(left, right)?;
        let mut summary = ComparisonSummary::default();

        log::info!(
            "Comparing {} with {}",
            left_root.display(),
            right_root.display()
        );
        self.check_canceled()?;

        let left_files = self.list(&left_root, Side::Left)?;
        let right_files = self.list(&right_root, Side::Right)?;
        summary.left_listed = left_files.len();
        summary.right_listed = right_files.len();

        let (left_files, right_files) = match self.config.filter {
            Some(ref filter) => {
                let left_kept = filter.filter(left_files, Side::Left, self.sink());
                self.check_canceled()?;
                let right_kept = filter.filter(right_files, Side::Right, self.sink());
                (left_kept, right_kept)
            }
            None => (left_files, right_files),
        };
        summary.left_filtered = summary.left_listed - left_files.len();
        summary.right_filtered = summary.right_listed - right_files.len();
        self.check_canceled()?;

        let (left_hashes, right_hashes) = self.hash_both(&left_files, &right_files)?;
        summary.bytes_hashed = left_hashes.bytes_hashed + right_hashes.bytes_hashed;
        self.check_canceled()?;

        log::info!("Comparing {} fingerprints", left_hashes.canonical.len());
        let sets = partition(&left_hashes.canonical, &right_hashes.canonical, self.sink());

        let collect = |map: &super::CanonicalMap| -> Vec<_> {
            map.iter().map(|(fp, f)| (*fp, f.clone())).collect()
        };
        summary.duration = start_time.elapsed();

        let result = ComparisonResult {
            common: sets.common,
            left_only: collect(&sets.left_only),
            right_only: collect(&sets.right_only),
            duplicates_left: left_hashes.duplicates,
            duplicates_right: right_hashes.duplicates,
            summary,
        };

        log::info!(
            "Comparison complete: {} common, {} left only, {} right only, {} + {} duplicates in {:.2?}",
            result.common.len(),
            result.left_only.len(),
            result.right_only.len(),
            result.duplicates_left.len(),
            result.duplicates_right.len(),
            result.summary.duration
        );

        Ok(result)
    }

    /// List one side after announcing it to the sink.
    fn list(&self, root: &Path, side: Side) -> Result<Vec<FileHandle>, CompareError> {
        self.sink()
            .on_event(&ProgressEvent::phase(Phase::Listing, side));

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        let files = walker.scan()?;
        log::info!("Listed {} files on {} side", files.len(), side);
        Ok(files)
    }

    /// Hash both sides concurrently and join.
    ///
    /// The first worker to fail stops the other one at its next file. A read
    /// error wins over the `Canceled` it causes on the other side.
    fn hash_both(
        &self,
        left: &[FileHandle],
        right: &[FileHandle],
    ) -> Result<(SideHashes, SideHashes), CompareError> {
        let sink = self.sink();
        let flag = self.config.shutdown_flag.as_deref();
        let abort = AtomicBool::new(false);
        let (left, right) = rayon::join(
            || hash_side(left, Side::Left, &self.hasher, sink, flag, Some(&abort)),
            || hash_side(right, Side::Right, &self.hasher, sink, flag, Some(&abort)),
        );

        match (left, right) {
            (Ok(left), Ok(right)) => Ok((left, right)),
            (Err(CompareError::Canceled), Err(e)) | (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }
}

/// Compare two directory trees with an optional exclusion pattern.
///
/// The pattern is compiled before the roots are touched, so a bad pattern
/// fails without any listing work.
///
/// # Errors
///
/// See [`Comparator::compare`].
pub fn compare(
    left: &Path,
    right: &Path,
    filter_pattern: Option<&str>,
    sink: Arc<dyn ProgressSink>,
) -> Result<ComparisonResult, CompareError> {
    let config = CompareConfig::default()
        .with_pattern(filter_pattern)?
        .with_progress(sink);
    Comparator::new(config).compare(left, right)
}

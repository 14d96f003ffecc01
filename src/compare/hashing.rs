//! Per-side fingerprinting and intra-side duplicate detection.
//!
//! [`hash_side`] walks one side's files in enumeration order. The first
//! file seen with a fingerprint becomes canonical for that side; every later
//! file with the same fingerprint becomes a [`DuplicateRecord`] and is never
//! promoted into the [`CanonicalMap`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::CompareError;
use crate::progress::{Phase, ProgressEvent, ProgressSink, Side};
use crate::scanner::{FileHandle, Fingerprint, Hasher};

/// Fingerprint → canonical file for one side.
///
/// Iteration follows insertion order, which is the walker's enumeration
/// order.
#[derive(Debug, Clone, Default)]
pub struct CanonicalMap {
    entries: Vec<(Fingerprint, FileHandle)>,
    index: HashMap<Fingerprint, usize>,
}

impl CanonicalMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `file` as canonical for `fingerprint` if the key is new.
    ///
    /// Returns the existing canonical file when the key was already present;
    /// the map is left untouched in that case.
    pub fn insert_first(
        &mut self,
        fingerprint: Fingerprint,
        file: FileHandle,
    ) -> Option<&FileHandle> {
        if let Some(&pos) = self.index.get(&fingerprint) {
            return Some(&self.entries[pos].1);
        }
        self.index.insert(fingerprint, self.entries.len());
        self.entries.push((fingerprint, file));
        None
    }

    /// Canonical file for a fingerprint.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&FileHandle> {
        self.index.get(fingerprint).map(|&pos| &self.entries[pos].1)
    }

    #[must_use]
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.index.contains_key(fingerprint)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &FileHandle)> {
        self.entries.iter().map(|(fp, f)| (fp, f))
    }

    /// Fingerprints in insertion order.
    pub fn fingerprints(&self) -> impl Iterator<Item = &Fingerprint> {
        self.entries.iter().map(|(fp, _)| fp)
    }
}

impl FromIterator<(Fingerprint, FileHandle)> for CanonicalMap {
    /// Build a map keeping the first file per fingerprint.
    fn from_iter<I: IntoIterator<Item = (Fingerprint, FileHandle)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (fp, file) in iter {
            let _ = map.insert_first(fp, file);
        }
        map
    }
}

/// A same-side file whose content matches an earlier canonical file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    /// Fingerprint shared by both files
    pub fingerprint: Fingerprint,
    /// The first file seen with this content
    pub canonical: FileHandle,
    /// The later file with the same content
    pub duplicate: FileHandle,
}

/// Output of hashing one side.
#[derive(Debug, Clone, Default)]
pub struct SideHashes {
    /// Canonical file per fingerprint
    pub canonical: CanonicalMap,
    /// Later files sharing a canonical fingerprint, in enumeration order
    pub duplicates: Vec<DuplicateRecord>,
    /// Total bytes streamed through the hasher
    pub bytes_hashed: u64,
}

/// Fingerprint every file of one side and split canonical from duplicate.
///
/// Files are processed strictly in the given order. Each file is opened,
/// fully read and closed before the next one. Both flags are checked
/// between files, never mid-file.
///
/// `abort` is shared with the worker hashing the other side. A read failure
/// raises it before returning, and a raised `abort` stops this worker with
/// [`CompareError::Canceled`] so the caller can surface the real error.
///
/// # Errors
///
/// - [`CompareError::NotFound`] / [`CompareError::Access`] on the first file
///   that cannot be read
/// - [`CompareError::Canceled`] if the shutdown flag or `abort` was raised
pub fn hash_side(
    files: &[FileHandle],
    side: Side,
    hasher: &Hasher,
    sink: &dyn ProgressSink,
    shutdown_flag: Option<&AtomicBool>,
    abort: Option<&AtomicBool>,
) -> Result<SideHashes, CompareError> {
    let total = files.len();
    let mut out = SideHashes::default();

    log::info!("Hashing {} files on {} side", total, side);

    for (idx, file) in files.iter().enumerate() {
        if shutdown_flag.is_some_and(|f| f.load(Ordering::SeqCst)) {
            log::debug!("Hashing {} side: shutdown requested", side);
            return Err(CompareError::Canceled);
        }
        if abort.is_some_and(|f| f.load(Ordering::SeqCst)) {
            log::debug!("Hashing {} side: stopped after the other side failed", side);
            return Err(CompareError::Canceled);
        }

        sink.on_event(&ProgressEvent::item(
            Phase::Hashing,
            side,
            &file.path,
            idx + 1,
            total,
        ));

        let (fingerprint, read) = hasher.fingerprint(&file.path).map_err(|e| {
            log::warn!("Failed to hash {}: {}", file.path.display(), e);
            if let Some(flag) = abort {
                flag.store(true, Ordering::SeqCst);
            }
            CompareError::from(e)
        })?;
        out.bytes_hashed += read;

        if let Some(canonical) = out.canonical.insert_first(fingerprint, file.clone()) {
            log::debug!(
                "Duplicate on {} side: {} == {} ({})",
                side,
                file.path.display(),
                canonical.path.display(),
                fingerprint.short()
            );
            out.duplicates.push(DuplicateRecord {
                fingerprint,
                canonical: canonical.clone(),
                duplicate: file.clone(),
            });
        } else {
            log::trace!("Canonical {}: {}", fingerprint.short(), file.path.display());
        }
    }

    log::info!(
        "Hashed {} side: {} unique contents, {} duplicates",
        side,
        out.canonical.len(),
        out.duplicates.len()
    );

    Ok(out)
}

//! Comparison result model and per-classification formatting.

use std::time::Duration;

use serde::Serialize;

use super::{CommonPair, DuplicateRecord};
use crate::progress::Side;
use crate::scanner::{FileHandle, Fingerprint};

/// Complete outcome of one comparison.
///
/// The five collections are disjoint. A fingerprint appears in at most one
/// of `common`, `left_only` and `right_only`; a non-canonical file appears
/// only in its side's duplicate list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonResult {
    /// Content present on both sides
    pub common: Vec<CommonPair>,
    /// Content only on the left, in enumeration order
    pub left_only: Vec<(Fingerprint, FileHandle)>,
    /// Content only on the right, in enumeration order
    pub right_only: Vec<(Fingerprint, FileHandle)>,
    /// Same-content files within the left tree
    pub duplicates_left: Vec<DuplicateRecord>,
    /// Same-content files within the right tree
    pub duplicates_right: Vec<DuplicateRecord>,
    /// Counts and timing, informational only
    #[serde(skip)]
    pub summary: ComparisonSummary,
}

impl ComparisonResult {
    /// Whether both trees hold exactly the same set of contents.
    ///
    /// Duplicates inside one tree do not count as a difference.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }

    /// Whether all five collections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.common.is_empty()
            && self.left_only.is_empty()
            && self.right_only.is_empty()
            && self.duplicates_left.is_empty()
            && self.duplicates_right.is_empty()
    }

    /// Flatten into tagged classifications: common, then unique left,
    /// unique right, duplicates left, duplicates right.
    #[must_use]
    pub fn classifications(&self) -> Vec<Classification> {
        let common = self.common.iter().map(|p| Classification::Common {
            fingerprint: p.fingerprint,
            left: p.left.clone(),
            right: p.right.clone(),
        });
        let unique = |side: Side, entries: &[(Fingerprint, FileHandle)]| {
            entries
                .iter()
                .map(move |(fp, f)| Classification::Unique {
                    side,
                    fingerprint: *fp,
                    file: f.clone(),
                })
                .collect::<Vec<_>>()
        };
        let dupes = |side: Side, records: &[DuplicateRecord]| {
            records
                .iter()
                .map(move |r| Classification::DuplicatePair {
                    side,
                    fingerprint: r.fingerprint,
                    canonical: r.canonical.clone(),
                    duplicate: r.duplicate.clone(),
                })
                .collect::<Vec<_>>()
        };

        common
            .chain(unique(Side::Left, &self.left_only))
            .chain(unique(Side::Right, &self.right_only))
            .chain(dupes(Side::Left, &self.duplicates_left))
            .chain(dupes(Side::Right, &self.duplicates_right))
            .collect()
    }
}

/// Counts and timing for one comparison.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonSummary {
    /// Files listed on the left before filtering
    pub left_listed: usize,
    /// Files listed on the right before filtering
    pub right_listed: usize,
    /// Left files removed by the filter
    pub left_filtered: usize,
    /// Right files removed by the filter
    pub right_filtered: usize,
    /// Bytes streamed through the hasher, both sides
    pub bytes_hashed: u64,
    /// Wall time of the whole comparison
    #[serde(serialize_with = "serialize_millis", rename = "duration_ms")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// One classified file or file pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Same content on both sides.
    Common {
        fingerprint: Fingerprint,
        left: FileHandle,
        right: FileHandle,
    },
    /// Content found on one side only.
    Unique {
        side: Side,
        fingerprint: Fingerprint,
        file: FileHandle,
    },
    /// A later same-side copy of a canonical file.
    DuplicatePair {
        side: Side,
        fingerprint: Fingerprint,
        canonical: FileHandle,
        duplicate: FileHandle,
    },
}

impl Classification {
    /// One-letter tag: `C`, `U` or `D`.
    #[must_use]
    pub fn tag(&self) -> char {
        match self {
            Self::Common { .. } => 'C',
            Self::Unique { .. } => 'U',
            Self::DuplicatePair { .. } => 'D',
        }
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        match self {
            Self::Common { fingerprint, .. }
            | Self::Unique { fingerprint, .. }
            | Self::DuplicatePair { fingerprint, .. } => *fingerprint,
        }
    }

    /// Render with the formatter for this variant.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Common { left, right, .. } => format_common(left, right),
            Self::Unique { side, file, .. } => format_unique(*side, file),
            Self::DuplicatePair {
                canonical,
                duplicate,
                ..
            } => format_duplicate(canonical, duplicate),
        }
    }
}

/// `C  left <=> right`
#[must_use]
pub fn format_common(left: &FileHandle, right: &FileHandle) -> String {
    format!("C  {} <=> {}", left.path.display(), right.path.display())
}

/// `U  path  (left)`
#[must_use]
pub fn format_unique(side: Side, file: &FileHandle) -> String {
    format!("U  {}  ({})", file.path.display(), side)
}

/// `D  canonical <=> duplicate`
#[must_use]
pub fn format_duplicate(canonical: &FileHandle, duplicate: &FileHandle) -> String {
    format!(
        "D  {} <=> {}",
        canonical.path.display(),
        duplicate.path.display()
    )
}

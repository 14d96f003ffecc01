//! Cross-side set comparison.
//!
//! [`partition`] reads two canonical maps and builds three new ones. Neither
//! input is modified.

use serde::Serialize;

use super::CanonicalMap;
use crate::progress::{Phase, ProgressEvent, ProgressSink, Side};
use crate::scanner::{FileHandle, Fingerprint};

/// Both sides' canonical files for one shared fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonPair {
    pub fingerprint: Fingerprint,
    pub left: FileHandle,
    pub right: FileHandle,
}

/// Result of partitioning two canonical maps.
///
/// Every fingerprint of either input lands in exactly one of the three
/// collections.
#[derive(Debug, Clone, Default)]
pub struct SetPartition {
    /// Fingerprints present on both sides, in left order
    pub common: Vec<CommonPair>,
    /// Fingerprints only on the left, in left order
    pub left_only: CanonicalMap,
    /// Fingerprints only on the right, in right order
    pub right_only: CanonicalMap,
}

/// Partition two canonical maps into common, left-only and right-only.
///
/// Reports one [`Phase::Comparing`] event per left fingerprint.
#[must_use]
pub fn partition(
    left: &CanonicalMap,
    right: &CanonicalMap,
    sink: &dyn ProgressSink,
) -> SetPartition {
    let total = left.len();
    let mut out = SetPartition::default();

    for (idx, (fingerprint, left_file)) in left.iter().enumerate() {
        sink.on_event(&ProgressEvent::item(
            Phase::Comparing,
            Side::Both,
            &left_file.path,
            idx + 1,
            total,
        ));

        match right.get(fingerprint) {
            Some(right_file) => out.common.push(CommonPair {
                fingerprint: *fingerprint,
                left: left_file.clone(),
                right: right_file.clone(),
            }),
            None => {
                let _ = out.left_only.insert_first(*fingerprint, left_file.clone());
            }
        }
    }

    out.right_only = right
        .iter()
        .filter(|(fp, _)| !left.contains(fp))
        .map(|(fp, f)| (*fp, f.clone()))
        .collect();

    log::debug!(
        "Partition: {} common, {} left only, {} right only",
        out.common.len(),
        out.left_only.len(),
        out.right_only.len()
    );

    out
}

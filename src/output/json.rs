//! JSON output formatter for comparison results.
//!
//! Provides machine-readable JSON output for scripting and automation. All
//! five categories are always included, regardless of `--show`.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "left": "/data/left",
//!   "right": "/data/right",
//!   "generated_at": "2026-01-01T12:00:00Z",
//!   "common": [{ "fingerprint": "ab12...", "left": "/data/left/a.txt", "right": "/data/right/b.txt", "size": 2 }],
//!   "left_only": [{ "fingerprint": "cd34...", "path": "/data/left/x", "size": 10 }],
//!   "right_only": [],
//!   "duplicates_left": [{ "fingerprint": "ab12...", "canonical": "...", "duplicate": "...", "size": 2 }],
//!   "duplicates_right": [],
//!   "summary": { "common": 1, "left_only": 1, "right_only": 0, "...": "..." }
//! }
//! ```

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compare::{ComparisonResult, DuplicateRecord};
use crate::error::ExitCode;
use crate::scanner::{FileHandle, Fingerprint};

/// One common pair.
#[derive(Debug, Clone, Serialize)]
pub struct JsonCommon {
    pub fingerprint: String,
    pub left: String,
    pub right: String,
    pub size: u64,
}

/// One file unique to a side.
#[derive(Debug, Clone, Serialize)]
pub struct JsonUnique {
    pub fingerprint: String,
    pub path: String,
    pub size: u64,
}

/// One same-side duplicate pair.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    pub fingerprint: String,
    pub canonical: String,
    pub duplicate: String,
    pub size: u64,
}

impl JsonDuplicate {
    fn from_record(record: &DuplicateRecord) -> Self {
        Self {
            fingerprint: record.fingerprint.to_hex(),
            canonical: path_string(&record.canonical.path),
            duplicate: path_string(&record.duplicate.path),
            size: record.duplicate.size,
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub common: usize,
    pub left_only: usize,
    pub right_only: usize,
    pub duplicates_left: usize,
    pub duplicates_right: usize,
    pub left_listed: usize,
    pub right_listed: usize,
    pub left_filtered: usize,
    pub right_filtered: usize,
    pub bytes_hashed: u64,
    pub duration_ms: u64,
    pub identical: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DM000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub left: String,
    pub right: String,
    pub generated_at: DateTime<Utc>,
    pub common: Vec<JsonCommon>,
    pub left_only: Vec<JsonUnique>,
    pub right_only: Vec<JsonUnique>,
    pub duplicates_left: Vec<JsonDuplicate>,
    pub duplicates_right: Vec<JsonDuplicate>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for a result.
    #[must_use]
    pub fn new(
        left: &Path,
        right: &Path,
        result: &ComparisonResult,
        exit_code: ExitCode,
    ) -> Self {
        let unique = |entries: &[(Fingerprint, FileHandle)]| -> Vec<JsonUnique> {
            entries
                .iter()
                .map(|(fp, f)| JsonUnique {
                    fingerprint: fp.to_hex(),
                    path: path_string(&f.path),
                    size: f.size,
                })
                .collect()
        };
        let s = &result.summary;

        Self {
            left: path_string(left),
            right: path_string(right),
            generated_at: Utc::now(),
            common: result
                .common
                .iter()
                .map(|p| JsonCommon {
                    fingerprint: p.fingerprint.to_hex(),
                    left: path_string(&p.left.path),
                    right: path_string(&p.right.path),
                    size: p.left.size,
                })
                .collect(),
            left_only: unique(&result.left_only),
            right_only: unique(&result.right_only),
            duplicates_left: result
                .duplicates_left
                .iter()
                .map(JsonDuplicate::from_record)
                .collect(),
            duplicates_right: result
                .duplicates_right
                .iter()
                .map(JsonDuplicate::from_record)
                .collect(),
            summary: JsonSummary {
                common: result.common.len(),
                left_only: result.left_only.len(),
                right_only: result.right_only.len(),
                duplicates_left: result.duplicates_left.len(),
                duplicates_right: result.duplicates_right.len(),
                left_listed: s.left_listed,
                right_listed: s.right_listed,
                left_filtered: s.left_filtered,
                right_filtered: s.right_filtered,
                bytes_hashed: s.bytes_hashed,
                duration_ms: u64::try_from(s.duration.as_millis()).unwrap_or(u64::MAX),
                identical: result.is_identical(),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()
    }
}

/// Lossy string form of a path, forward slashes on Windows.
fn path_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

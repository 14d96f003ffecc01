//! CSV output formatter for comparison results.
//!
//! One row is generated per classification in the selected categories.
//!
//! # Columns
//!
//! - `category`: `common`, `unique` or `duplicate`
//! - `side`: `both`, `left` or `right`
//! - `fingerprint`: BLAKE3 content hash (hexadecimal)
//! - `left_path`: Left file (common), the file (unique) or canonical file (duplicate)
//! - `right_path`: Right file (common), empty (unique) or duplicate file (duplicate)
//! - `size`: File size in bytes

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::cli::ShowCategory;
use crate::compare::{Classification, ComparisonResult};
use crate::progress::Side;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow {
    category: &'static str,
    side: Side,
    fingerprint: String,
    left_path: String,
    right_path: String,
    size: u64,
}

impl CsvRow {
    fn from_classification(c: &Classification) -> Self {
        let fingerprint = c.fingerprint().to_hex();
        match c {
            Classification::Common { left, right, .. } => Self {
                category: "common",
                side: Side::Both,
                fingerprint,
                left_path: left.path.to_string_lossy().into_owned(),
                right_path: right.path.to_string_lossy().into_owned(),
                size: left.size,
            },
            Classification::Unique { side, file, .. } => Self {
                category: "unique",
                side: *side,
                fingerprint,
                left_path: file.path.to_string_lossy().into_owned(),
                right_path: String::new(),
                size: file.size,
            },
            Classification::DuplicatePair {
                side,
                canonical,
                duplicate,
                ..
            } => Self {
                category: "duplicate",
                side: *side,
                fingerprint,
                left_path: canonical.path.to_string_lossy().into_owned(),
                right_path: duplicate.path.to_string_lossy().into_owned(),
                size: duplicate.size,
            },
        }
    }
}

/// Whether a classification belongs to one of the shown categories.
pub(crate) fn is_shown(c: &Classification, show: &[ShowCategory]) -> bool {
    let category = match c {
        Classification::Common { .. } => ShowCategory::Common,
        Classification::Unique { .. } => ShowCategory::Unique,
        Classification::DuplicatePair { .. } => ShowCategory::Duplicates,
    };
    show.contains(&category) || show.contains(&ShowCategory::All)
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    result: &'a ComparisonResult,
    show: &'a [ShowCategory],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(result: &'a ComparisonResult, show: &'a [ShowCategory]) -> Self {
        Self { result, show }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for c in self
            .result
            .classifications()
            .iter()
            .filter(|c| is_shown(c, self.show))
        {
            csv_writer.serialize(CsvRow::from_classification(c))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

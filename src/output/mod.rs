//! Report formatters for comparison results.
//!
//! - text for people (category lines plus a summary)
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dirmatch::cli::{OutputFormat, ShowCategory};
//! use dirmatch::compare::Comparator;
//! use dirmatch::output::write_report;
//! use std::path::Path;
//!
//! let result = Comparator::with_defaults()
//!     .compare(Path::new("left"), Path::new("right"))
//!     .unwrap();
//! let report = dirmatch::output::Report {
//!     left: Path::new("left"),
//!     right: Path::new("right"),
//!     format: OutputFormat::Json,
//!     show: &[ShowCategory::All],
//! };
//! write_report(&report, &result, std::io::stdout()).unwrap();
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

pub use self::csv::{CsvOutput, CsvOutputError};
pub use json::JsonOutput;
pub use text::TextOutput;

use crate::cli::{OutputFormat, ShowCategory};
use crate::compare::ComparisonResult;
use crate::error::ExitCode;

/// What to render and how.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub left: &'a Path,
    pub right: &'a Path,
    pub format: OutputFormat,
    pub show: &'a [ShowCategory],
}

/// Exit code a finished comparison maps to.
#[must_use]
pub fn exit_code_for(result: &ComparisonResult) -> ExitCode {
    if result.is_identical() {
        ExitCode::Identical
    } else {
        ExitCode::Success
    }
}

/// Render `result` into `writer` in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_report<W: Write>(
    report: &Report<'_>,
    result: &ComparisonResult,
    writer: W,
) -> Result<()> {
    match report.format {
        OutputFormat::Text => TextOutput::new(result, report.show)
            .write_to(writer)
            .context("Failed to write text report"),
        OutputFormat::Json => {
            JsonOutput::new(report.left, report.right, result, exit_code_for(result))
                .write_to(writer)
                .context("Failed to write JSON report")
        }
        OutputFormat::Csv => CsvOutput::new(result, report.show)
            .write_to(writer)
            .context("Failed to write CSV report"),
    }
}

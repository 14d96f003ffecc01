//! Structured error handling and exit codes.

use serde::Serialize;

use crate::compare::{CompareError, UsageError};

/// Exit codes for the dirmatch application.
///
/// - 0: Success (comparison completed, the trees differ)
/// - 1: General error (unreadable path, unexpected failure)
/// - 2: Usage error (bad roots or filter pattern)
/// - 3: Identical (every content exists on both sides)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Comparison completed and differences were found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Usage error: Invalid arguments, nothing was scanned.
    UsageError = 2,
    /// Identical: Comparison completed with no left-only or right-only files.
    Identical = 3,
    /// Interrupted: Comparison was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DM000",
            Self::GeneralError => "DM001",
            Self::UsageError => "DM002",
            Self::Identical => "DM003",
            Self::Interrupted => "DM130",
        }
    }

    /// Pick the exit code for an error returned by `run_app`.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if let Some(compare) = err.downcast_ref::<CompareError>() {
            return match compare {
                CompareError::Canceled => Self::Interrupted,
                CompareError::Usage(_) => Self::UsageError,
                _ => Self::GeneralError,
            };
        }
        if err.downcast_ref::<UsageError>().is_some() {
            return Self::UsageError;
        }
        Self::GeneralError
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DM001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

//! Full-path regex exclusion.
//!
//! A [`PathFilter`] drops every file whose full path matches its pattern.
//! The pattern is compiled once, up front, so a bad expression is reported
//! before any directory is listed.

use regex::Regex;

use super::FileHandle;
use crate::progress::{Phase, ProgressEvent, ProgressSink, Side};

/// Compiled exclusion pattern applied to full file paths.
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: Regex,
}

impl PathFilter {
    /// Compile an exclusion pattern.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] if the pattern does not parse.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// The source text of the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the file at `path` is excluded.
    ///
    /// Matching is an unanchored search over the lossy UTF-8 form of the
    /// full path.
    #[must_use]
    pub fn is_excluded(&self, path: &std::path::Path) -> bool {
        self.pattern.is_match(&path.to_string_lossy())
    }

    /// Drop excluded files, keeping enumeration order.
    ///
    /// Reports one [`Phase::Filtering`] event per examined file.
    #[must_use]
    pub fn filter(
        &self,
        files: Vec<FileHandle>,
        side: Side,
        sink: &dyn ProgressSink,
    ) -> Vec<FileHandle> {
        let total = files.len();
        let mut kept = Vec::with_capacity(total);

        for (idx, file) in files.into_iter().enumerate() {
            sink.on_event(&ProgressEvent::item(
                Phase::Filtering,
                side,
                &file.path,
                idx + 1,
                total,
            ));
            if self.is_excluded(&file.path) {
                log::trace!("Excluded by filter: {}", file.path.display());
            } else {
                kept.push(file);
            }
        }

        log::debug!(
            "Filter '{}' kept {} of {} files on {} side",
            self.as_str(),
            kept.len(),
            total,
            side
        );
        kept
    }
}

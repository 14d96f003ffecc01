//! Human-readable text report.
//!
//! One line per classification in the selected categories, followed by a
//! short summary. Colors come from `yansi` and are disabled globally by
//! `--no-color` / `NO_COLOR`.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::cli::ShowCategory;
use crate::compare::{Classification, ComparisonResult};

use super::csv::is_shown;

/// Text report formatter.
pub struct TextOutput<'a> {
    result: &'a ComparisonResult,
    show: &'a [ShowCategory],
}

impl<'a> TextOutput<'a> {
    #[must_use]
    pub fn new(result: &'a ComparisonResult, show: &'a [ShowCategory]) -> Self {
        Self { result, show }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for c in self
            .result
            .classifications()
            .iter()
            .filter(|c| is_shown(c, self.show))
        {
            writeln!(writer, "{}", paint_line(c))?;
        }

        self.write_summary(&mut writer)?;
        writer.flush()
    }

    fn write_summary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let r = self.result;
        let s = &r.summary;

        writeln!(writer)?;
        writeln!(
            writer,
            "{} common, {} left only, {} right only, {} duplicate(s) left, {} duplicate(s) right",
            r.common.len(),
            r.left_only.len(),
            r.right_only.len(),
            r.duplicates_left.len(),
            r.duplicates_right.len(),
        )?;
        writeln!(
            writer,
            "Listed {} left / {} right, ignored {} / {}, hashed {} in {:.2?}",
            s.left_listed,
            s.right_listed,
            s.left_filtered,
            s.right_filtered,
            ByteSize::b(s.bytes_hashed),
            s.duration,
        )?;

        if r.is_identical() {
            writeln!(writer, "{}", "Both folders hold the same content.".green().bold())?;
        } else {
            writeln!(writer, "{}", "The folders differ.".yellow().bold())?;
        }
        Ok(())
    }
}

/// Classification line with its tag colored.
fn paint_line(c: &Classification) -> String {
    let line = c.display();
    let (tag, rest) = line.split_at(1);
    let tag = match c {
        Classification::Common { .. } => tag.green().to_string(),
        Classification::Unique { .. } => tag.yellow().bold().to_string(),
        Classification::DuplicatePair { .. } => tag.cyan().to_string(),
    };
    format!("{tag}{rest}")
}

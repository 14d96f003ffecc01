//! Progress reporting for the comparison pipeline.
//!
//! The engine reports through the [`ProgressSink`] trait. Both hashing
//! workers call the same sink concurrently, so implementations must be
//! `Send + Sync`. [`Progress`] is the terminal implementation built on
//! indicatif; [`NoopSink`] discards everything.
//!
//! Any `Fn(&ProgressEvent) + Send + Sync` closure is also a sink:
//!
//! ```
//! use dirmatch::progress::{ProgressEvent, ProgressSink};
//!
//! let sink = |event: &ProgressEvent| println!("{}", event);
//! let _: &dyn ProgressSink = &sink;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;

/// Pipeline stage being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Enumerating files under one root.
    Listing,
    /// Applying the exclusion pattern.
    Filtering,
    /// Fingerprinting file content.
    Hashing,
    /// Matching fingerprints across sides.
    Comparing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Listing => "Listing",
            Self::Filtering => "Filtering",
            Self::Hashing => "Hashing",
            Self::Comparing => "Comparing",
        };
        f.write_str(name)
    }
}

/// Which directory tree an event or file belongs to.
///
/// `Both` only appears on [`Phase::Comparing`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The first tree.
    Left,
    /// The second tree.
    Right,
    /// Both trees at once.
    Both,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

/// One progress notification.
///
/// `current_index` and `total_count` are `None` for phase-level events and
/// set for per-file events. `current_index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub side: Side,
    pub current_item: Option<PathBuf>,
    pub current_index: Option<usize>,
    pub total_count: Option<usize>,
}

impl ProgressEvent {
    /// Phase-level event with no per-file detail.
    #[must_use]
    pub fn phase(phase: Phase, side: Side) -> Self {
        Self {
            phase,
            side,
            current_item: None,
            current_index: None,
            total_count: None,
        }
    }

    /// Per-file event.
    #[must_use]
    pub fn item(phase: Phase, side: Side, path: &Path, index: usize, total: usize) -> Self {
        Self {
            phase,
            side,
            current_item: Some(path.to_path_buf()),
            current_index: Some(index),
            total_count: Some(total),
        }
    }

    /// Completion percentage for per-file events.
    #[must_use]
    pub fn percent(&self) -> Option<u32> {
        match (self.current_index, self.total_count) {
            (Some(_), Some(0)) => Some(100),
            (Some(index), Some(total)) => {
                Some(((index as f64 / total as f64) * 100.0).round() as u32)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.phase, self.side)?;
        if let (Some(index), Some(total), Some(pct)) =
            (self.current_index, self.total_count, self.percent())
        {
            write!(f, " {}% {}/{}", pct, index, total)?;
            if let Some(name) = self.current_item.as_deref().and_then(Path::file_name) {
                write!(f, " {}", name.to_string_lossy())?;
            }
        }
        Ok(())
    }
}

/// Receiver for pipeline progress.
///
/// Called from worker threads; implementations must tolerate concurrent
/// calls from the two hashing workers.
pub trait ProgressSink: Send + Sync {
    /// Called once per reported step.
    fn on_event(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event);
    }
}

/// Sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Terminal progress reporter using indicatif.
///
/// Keeps one bar per (phase, side): a spinner while a side is listed, a
/// counted bar for filtering and hashing, and one bar for comparing.
pub struct Progress {
    multi: MultiProgress,
    bars: Mutex<HashMap<(Phase, Side), ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            quiet,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bar_style(phase: Phase) -> ProgressStyle {
        let template = match phase {
            Phase::Hashing => {
                "{prefix:>15} [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})"
            }
            _ => "{prefix:>15} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }

    /// Finish the listing spinner for `side` once that side moves on.
    fn finish_listing(bars: &mut HashMap<(Phase, Side), ProgressBar>, side: Side) {
        let sides: &[Side] = match side {
            Side::Both => &[Side::Left, Side::Right],
            Side::Left => &[Side::Left],
            Side::Right => &[Side::Right],
        };
        for s in sides {
            if let Some(pb) = bars.remove(&(Phase::Listing, *s)) {
                pb.finish_with_message(format!("Listed {}", s));
            }
        }
    }

    /// Finish and clear every bar still running.
    pub fn finish(&self) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        for (_, pb) in bars.drain() {
            pb.finish();
        }
    }
}

impl ProgressSink for Progress {
    fn on_event(&self, event: &ProgressEvent) {
        if self.quiet {
            return;
        }
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };

        if event.phase != Phase::Listing {
            Self::finish_listing(&mut bars, event.side);
        }

        let key = (event.phase, event.side);
        let pb = bars.entry(key).or_insert_with(|| match event.total_count {
            Some(total) => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::bar_style(event.phase));
                pb.set_prefix(format!("{} {}", event.phase, event.side));
                pb
            }
            None => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
        });

        match event.current_index {
            Some(index) => {
                pb.set_position(index as u64);
                if let Some(path) = event.current_item.as_deref() {
                    pb.set_message(truncate_path(&path.to_string_lossy(), 30));
                }
                if event.total_count == Some(index) {
                    pb.finish_with_message("done");
                    bars.remove(&key);
                }
            }
            None => pb.set_message(event.to_string()),
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        let tail: String = file_name
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}

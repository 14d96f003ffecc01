//! Command-line interface definitions for dirmatch.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Show files whose content exists on only one side
//! dirmatch compare ~/Photos /mnt/backup/Photos
//!
//! # Everything, as JSON, ignoring temp files
//! dirmatch compare ~/Photos /mnt/backup/Photos --show all -o json -i '\.tmp$'
//!
//! # Verbose mode for debugging
//! dirmatch -v compare left right
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Config;

/// Compare two directory trees by file content.
///
/// Files are matched by a BLAKE3 fingerprint of their bytes, never by name
/// or location. Every file ends up common, unique to one side, or a
/// duplicate of another file on its own side.
#[derive(Debug, Parser)]
#[command(name = "dirmatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read settings from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare two directories by content
    Compare(CompareArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the compare subcommand.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Left directory
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Right directory
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Regular expression; files whose full path matches are skipped on both sides
    #[arg(short, long = "ignore", value_name = "REGEX")]
    pub ignore: Option<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Categories to include in text/CSV reports (comma separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub show: Vec<ShowCategory>,

    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Follow symbolic links while listing
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do not draw progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// Effective settings for one comparison, after merging config and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareSettings {
    pub ignore: Option<String>,
    pub output: OutputFormat,
    pub show: Vec<ShowCategory>,
    pub follow_symlinks: bool,
    pub progress: bool,
}

impl CompareArgs {
    /// Merge these flags over the loaded configuration. Flags win.
    #[must_use]
    pub fn resolve(&self, config: &Config) -> CompareSettings {
        let show = if self.show.is_empty() {
            config.show.clone()
        } else {
            self.show.clone()
        };
        CompareSettings {
            ignore: self
                .ignore
                .clone()
                .or_else(|| config.ignore.clone())
                .filter(|p| !p.is_empty()),
            output: self.output.unwrap_or(config.output),
            show: ShowCategory::expand(&show),
            follow_symlinks: self.follow_symlinks || config.follow_symlinks,
            progress: !self.no_progress && config.progress,
        }
    }
}

/// Output format for comparison reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Result categories that can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowCategory {
    /// Content present on both sides
    Common,
    /// Content present on one side only
    Unique,
    /// Same-side duplicate pairs
    Duplicates,
    /// Every category
    All,
}

impl ShowCategory {
    /// Replace `All` with the three concrete categories and drop repeats.
    ///
    /// An empty selection means `Unique`.
    #[must_use]
    pub fn expand(selection: &[ShowCategory]) -> Vec<ShowCategory> {
        if selection.is_empty() {
            return vec![ShowCategory::Unique];
        }
        if selection.contains(&ShowCategory::All) {
            return vec![
                ShowCategory::Common,
                ShowCategory::Unique,
                ShowCategory::Duplicates,
            ];
        }
        let mut out = Vec::new();
        for cat in selection {
            if !out.contains(cat) {
                out.push(*cat);
            }
        }
        out
    }
}

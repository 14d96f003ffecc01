//! dirmatch - Compare two directory trees by content
//!
//! Files on both sides are fingerprinted with BLAKE3 and classified as
//! common, unique to one side, or a duplicate of an earlier file on the
//! same side. Names and locations play no part in matching.

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::fs::File;
use std::io::{self, BufWriter};
use std::sync::Arc;

use anyhow::{Context, Result};

use cli::{Cli, Commands, CompareArgs};
use compare::{Comparator, CompareConfig};
use config::Config;
use error::ExitCode;
use output::Report;
use progress::Progress;
use scanner::WalkerConfig;

/// Run the application for parsed arguments.
///
/// # Errors
///
/// Returns any usage, listing, hashing or report error. The caller maps it
/// to an exit code with [`ExitCode::for_error`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    match cli.command {
        Commands::Config => {
            let config = Config::resolve(cli.config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(ExitCode::Success)
        }
        Commands::Compare(ref args) => run_compare(&cli, args),
    }
}

fn run_compare(cli: &Cli, args: &CompareArgs) -> Result<ExitCode> {
    let config = Config::resolve(cli.config.as_deref())?;
    let settings = args.resolve(&config);
    log::debug!("Effective settings: {:?}", settings);

    let progress = Arc::new(Progress::new(cli.quiet || !settings.progress));
    let handler = signal::install_handler()?;

    let compare_config = CompareConfig::default()
        .with_pattern(settings.ignore.as_deref())?
        .with_walker_config(WalkerConfig::new(settings.follow_symlinks))
        .with_shutdown_flag(handler.get_flag())
        .with_progress(progress.clone());

    let outcome = Comparator::new(compare_config).compare(&args.left, &args.right);
    progress.finish();
    let result = outcome?;

    let report = Report {
        left: &args.left,
        right: &args.right,
        format: settings.output,
        show: &settings.show,
    };

    match args.output_file {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            output::write_report(&report, &result, BufWriter::new(file))?;
            log::info!("Report written to {}", path.display());
        }
        None => output::write_report(&report, &result, io::stdout().lock())?,
    }

    Ok(output::exit_code_for(&result))
}

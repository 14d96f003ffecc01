//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (or `--config PATH`)
//! 3. Environment variables prefixed with `DIRMATCH_` (e.g. `DIRMATCH_OUTPUT=json`)
//!
//! Command-line flags are applied on top by [`crate::cli::CompareArgs::resolve`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, ShowCategory};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DIRMATCH_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default exclusion pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<String>,
    /// Default report format.
    #[serde(default)]
    pub output: OutputFormat,
    /// Default categories for text/CSV reports.
    #[serde(default = "default_show")]
    pub show: Vec<ShowCategory>,
    /// Follow symbolic links while listing.
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Draw progress bars.
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_show() -> Vec<ShowCategory> {
    vec![ShowCategory::Unique]
}

fn default_progress() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: None,
            output: OutputFormat::Text,
            show: default_show(),
            follow_symlinks: false,
            progress: default_progress(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Any failure falls back to the defaults. Without a platform config
    /// directory only the environment layer applies.
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("No config file location: {:#}", e);
                None
            }
        };
        Self::load_layers(path.as_deref())
    }

    fn load_layers(path: Option<&Path>) -> Self {
        match Self::figment(path).extract() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from an explicit file, then the environment.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment value does not parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::figment(Some(path))
            .extract()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Resolve the configuration for the CLI.
    ///
    /// An explicit path must load cleanly; the default path never fails.
    ///
    /// # Errors
    ///
    /// Returns an error only for an explicit path that fails to load.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file not found: {}", path.display());
                }
                Self::load_from(path)
            }
            None => Ok(Self::load()),
        }
    }

    /// Serialize as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Get the default platform-specific configuration path.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dirmatch", "dirmatch")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}

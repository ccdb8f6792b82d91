//! CLI argument parsing module for bump-deps-index

use crate::error::ConfigError;
use crate::registry::{DEFAULT_INDEX_URL, DEFAULT_NPM_REGISTRY};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Default number of concurrent registry requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Bump dependency specifiers to the latest versions on a package index
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bump-deps-index",
    version,
    about = "Bump dependency specifiers to the latest versions on a package index"
)]
pub struct CliArgs {
    /// Specifiers to resolve (e.g. "requests>=2", "prettier@3")
    pub pkgs: Vec<String>,

    /// Manifest files to rewrite in place (can be specified multiple times)
    #[arg(short = 'f', long = "file", action = ArgAction::Append)]
    pub files: Vec<PathBuf>,

    // Registry options
    /// Python package index (simple API) to query
    #[arg(long, env = "PIP_INDEX_URL", default_value = DEFAULT_INDEX_URL)]
    pub index_url: String,

    /// npm registry to query
    #[arg(long, env = "NPM_CONFIG_REGISTRY", default_value = DEFAULT_NPM_REGISTRY)]
    pub npm_registry: String,

    /// Allow pre-release versions
    #[arg(short = 'p', long)]
    pub pre_release: bool,

    /// Maximum number of concurrent registry requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    // General options
    /// Dry run mode - show what would be updated without writing files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - only warnings and errors are logged
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Check values clap cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in [&self.index_url, &self.npm_registry] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl { value: url.clone() });
            }
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            });
        }
        Ok(())
    }

    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Specifiers given on the command line, trimmed, blanks dropped
    pub fn specs(&self) -> Vec<String> {
        self.pkgs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

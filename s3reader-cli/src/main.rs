// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! s3reader CLI - read object-store and HTTP(S) addresses as local files.
//!
//! # Examples
//!
//! ```bash
//! # Print an object to stdout
//! s3reader cat s3://my-bucket/data/file.csv
//!
//! # Download to a local path, with a named profile
//! s3reader --profile analytics copy s3://my-bucket/data/file.csv ./file.csv
//!
//! # Show how an address is interpreted
//! s3reader classify https://example.com/a.txt --format json
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use s3reader::{Config, RetryMode};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{cat, classify, config, copy};

// ============================================================================
// CLI Definition
// ============================================================================

/// s3reader CLI - use remote files as if they were local.
#[derive(Parser)]
#[command(name = "s3reader")]
#[command(about = "Read object-store and HTTP(S) addresses as local files")]
#[command(long_about = r"
s3reader downloads a remote address into a private temp directory, uses it,
and removes the copy afterwards. Local paths are used in place.

Supported addresses:
  s3://bucket/key
  http://host/path
  https://host/path
  any local path

Examples:
  s3reader cat s3://bucket/data.csv
  s3reader copy https://example.com/a.txt ./a.txt
  s3reader classify s3://bucket//nested///key.csv
")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Named credentials profile.
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Region of the object store.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Role to assume before downloading.
    #[arg(long, global = true)]
    pub role_arn: Option<String>,

    /// Session name used when assuming a role.
    #[arg(long, global = true)]
    pub session_name: Option<String>,

    /// Per-request retry mode of the client (standard, legacy, adaptive).
    #[arg(long, global = true)]
    pub retry_mode: Option<RetryMode>,

    /// Per-request attempt limit of the client.
    #[arg(long, global = true)]
    pub request_attempts: Option<u32>,

    /// Attempts for the credential retry loop.
    #[arg(long, global = true)]
    pub max_trials: Option<u32>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (no logging, no error message).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Write the content of an address to stdout.
    Cat(cat::CatArgs),

    /// Copy the content of an address to a local path.
    #[command(visible_alias = "cp")]
    Copy(copy::CopyArgs),

    /// Show how an address is interpreted.
    Classify(classify::ClassifyArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// The address could not be parsed.
    InvalidAddress = 2,
}

impl Cli {
    /// Path of the configuration file in use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Loads the configuration and applies command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Applies command-line overrides on top of `config`.
    pub fn apply_overrides(&self, config: &mut Config) {
        let mut client = std::mem::take(&mut config.client);

        if let Some(profile) = &self.profile {
            client = client.with_profile(profile);
        }
        if let Some(region) = &self.region {
            client = client.with_region(region);
        }
        if let Some(role_arn) = &self.role_arn {
            client = client.with_role(role_arn);
        }
        if let Some(session_name) = &self.session_name {
            client = client.with_session_name(session_name);
        }
        if self.retry_mode.is_some() || self.request_attempts.is_some() {
            let mode = self.retry_mode.unwrap_or(client.retry_mode);
            let attempts = self.request_attempts.unwrap_or(client.max_attempts);
            client = client.with_request_retries(mode, attempts);
        }

        config.client = client;
        if let Some(max_trials) = self.max_trials {
            config.max_trials = max_trials;
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("s3reader=debug,info")
    } else {
        EnvFilter::new("s3reader=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn exit_code(error: &anyhow::Error) -> ExitCode {
    let invalid_address = error
        .downcast_ref::<s3reader::FetchError>()
        .is_some_and(|e| matches!(e, s3reader::FetchError::Address(_)))
        || error.downcast_ref::<s3reader::AddressError>().is_some();

    if invalid_address {
        ExitCode::InvalidAddress
    } else {
        ExitCode::Error
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Cat(args) => cat::run(args, &cli),
        Commands::Copy(args) => copy::run(args, &cli),
        Commands::Classify(args) => classify::run(args),
        Commands::Config(args) => config::run(args, &cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(exit_code(&e) as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "s3reader",
            "cat",
            "s3://b/k.csv",
            "--profile",
            "analytics",
            "--max-trials",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.profile.as_deref(), Some("analytics"));
        assert_eq!(cli.max_trials, Some(3));
        assert!(matches!(cli.command, Commands::Cat(_)));
    }

    #[test]
    fn test_overrides_apply_to_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"client": {"region_name": "us-east-1"}, "max_trials": 4}"#)
            .unwrap();

        let cli = Cli::try_parse_from([
            "s3reader",
            "--config",
            path.to_str().unwrap(),
            "--role-arn",
            "arn:aws:iam::123456789012:role/reader",
            "classify",
            "x",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();

        assert_eq!(config.client.region_name.as_deref(), Some("us-east-1"));
        assert_eq!(
            config.client.role_arn.as_deref(),
            Some("arn:aws:iam::123456789012:role/reader")
        );
        assert_eq!(config.max_trials, 4);
    }

    #[test]
    fn test_request_retry_overrides_keep_unset_half() {
        let cli = Cli::try_parse_from([
            "s3reader",
            "--retry-mode",
            "adaptive",
            "--session-name",
            "nightly-export",
            "classify",
            "x",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.client.retry_mode, RetryMode::Adaptive);
        assert_eq!(config.client.max_attempts, 10);
        assert_eq!(config.client.session_name, "nightly-export");
    }

    #[test]
    fn test_address_errors_get_their_own_exit_code() {
        let err = anyhow::Error::from(s3reader::FetchError::Address(
            s3reader::AddressError::MissingBucket("s3:/".into()),
        ));
        assert!(matches!(exit_code(&err), ExitCode::InvalidAddress));

        let err = anyhow::anyhow!("boom");
        assert!(matches!(exit_code(&err), ExitCode::Error));
    }
}

//! Config command - inspect and write the configuration file.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use s3reader::Config;
use tracing::info;

use crate::Cli;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration, with overrides applied.
    Show,

    /// Show the configuration file path.
    Path,

    /// Write a configuration file from defaults plus overrides.
    Init {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => {
            println!("{}", render(&cli.load_config()?)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", cli.config_path().display());
            Ok(())
        }
        ConfigAction::Init { force } => init(cli, *force),
    }
}

/// Pretty JSON with secrets masked.
fn render(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    for secret in [
        &mut shown.client.secret_access_key,
        &mut shown.client.session_token,
    ] {
        if secret.is_some() {
            *secret = Some("<redacted>".to_string());
        }
    }
    Ok(serde_json::to_string_pretty(&shown)?)
}

fn init(cli: &Cli, force: bool) -> Result<()> {
    let path = cli.config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }

    let mut config = Config::default();
    cli.apply_overrides(&mut config);
    match &cli.config {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    info!(path = %path.display(), "Initialized configuration");
    if !cli.quiet {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use s3reader::RetryMode;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("s3reader").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_init_writes_overrides_and_refuses_to_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let path_arg = path.to_str().unwrap();

        let first = cli(&[
            "-q", "--config", path_arg, "--region", "eu-central-1", "--max-trials", "2",
            "config", "init",
        ]);
        init(&first, false).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.client.region_name.as_deref(), Some("eu-central-1"));
        assert_eq!(saved.max_trials, 2);

        assert!(init(&first, false).is_err());

        let second = cli(&[
            "-q", "--config", path_arg, "--retry-mode", "legacy", "config", "init", "--force",
        ]);
        init(&second, true).unwrap();
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.client.retry_mode, RetryMode::Legacy);
        assert_eq!(saved.client.region_name, None);
    }

    #[test]
    fn test_show_masks_secrets() {
        let mut config = Config::default();
        config.client = config
            .client
            .with_static_credentials("AKIDEXAMPLE", "very-secret", Some("token".into()));

        let out = render(&config).unwrap();

        assert!(out.contains("AKIDEXAMPLE"));
        assert!(!out.contains("very-secret"));
        assert!(!out.contains("\"token\""));
        assert!(out.contains("<redacted>"));
    }
}

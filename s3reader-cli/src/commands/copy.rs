//! Copy command - materialize an address at a local path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use s3reader::File;
use tracing::info;

use crate::Cli;

/// Arguments for the copy command.
#[derive(Args)]
pub struct CopyArgs {
    /// Address to read (local path, s3://, http:// or https://).
    pub address: String,

    /// Destination file, or an existing directory to copy into.
    pub destination: PathBuf,
}

/// Runs the copy command.
pub fn run(args: &CopyArgs, cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let file = File::builder(args.address.as_str())
        .config(&config)
        .open()?;

    let target = destination_for(&args.destination, file.file_name());
    let bytes = std::fs::copy(file.path(), &target)
        .with_context(|| format!("copying to {}", target.display()))?;

    info!(target = %target.display(), bytes, "Copied file");
    if !cli.quiet {
        eprintln!("{} -> {}", file.original(), target.display());
    }
    Ok(())
}

/// Resolves the final path: directories receive the address's file name.
fn destination_for(destination: &Path, file_name: &str) -> PathBuf {
    if destination.is_dir() && !file_name.is_empty() {
        destination.join(file_name)
    } else {
        destination.to_path_buf()
    }
}

//! Cat command - write an address to stdout.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use s3reader::File;

use crate::Cli;

/// Arguments for the cat command.
#[derive(Args)]
pub struct CatArgs {
    /// Address to read (local path, s3://, http:// or https://).
    pub address: String,
}

/// Runs the cat command.
pub fn run(args: &CatArgs, cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let file = File::builder(args.address.as_str())
        .config(&config)
        .open()?;

    let mut source = std::fs::File::open(file.path())
        .with_context(|| format!("opening {}", file.path().display()))?;
    let mut stdout = io::stdout().lock();
    io::copy(&mut source, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}

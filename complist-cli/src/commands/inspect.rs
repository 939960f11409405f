//! Inspect command - list the contents of an archive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use complist_export::load_archive;
use tracing::debug;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Archive to inspect.
    pub archive: PathBuf,
}

/// Runs the inspect command.
pub async fn run(args: &InspectArgs, cli: &Cli) -> Result<ExitCode> {
    debug!(path = %args.archive.display(), "Inspecting archive");

    let files = load_archive(&args.archive)
        .await
        .with_context(|| format!("Failed to read archive {}", args.archive.display()))?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_archive(&args.archive, &files));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_archive(&files)?);
        }
    }

    Ok(ExitCode::Success)
}

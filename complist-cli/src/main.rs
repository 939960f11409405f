// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! complist - export platform component catalogs from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Export every category to component_lists.zip
//! complist --base-url https://gateway.example.com --token "$TOKEN"
//!
//! # Only forms, updated during March
//! complist export --category single_form,multi_form --start 2024-03-01 --end 2024-03-31
//!
//! # Cap data-manager records per table group
//! complist export --limit-data-manager 500
//!
//! # JSON summary
//! complist --format json --pretty export
//!
//! # Look inside an existing archive
//! complist inspect component_lists.zip
//! ```

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{categories, config as config_cmd, export, inspect};

// ============================================================================
// CLI Definition
// ============================================================================

/// complist - component catalog exporter.
#[derive(Parser)]
#[command(name = "complist")]
#[command(about = "Export platform component catalogs to a zip of CSV files")]
#[command(long_about = r#"
complist lists the components of a platform company and packs them into
one zip archive with a CSV file per category.

Categories:
  • Single Form   (single_form)
  • Multi Form    (multi_form)
  • Data Manager  (data_manager)
  • Automations   (automations)

Examples:
  complist                                  # Export all categories
  complist export --category automations    # One category
  complist export --start 2024-01-01        # Updated since a day
  complist --format json export             # JSON summary
  complist inspect component_lists.zip      # List archive contents
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'export' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Platform base URL.
    #[arg(long, env = "COMPLIST_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token.
    #[arg(long, env = "COMPLIST_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Company id used to scope listings.
    #[arg(long, env = "COMPLIST_COMPANY_ID", global = true)]
    pub company_id: Option<String>,

    /// Configuration file.
    #[arg(long, env = "COMPLIST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch categories and write the archive (default if no command specified).
    #[command(visible_alias = "e")]
    Export(export::ExportArgs),

    /// List known categories.
    #[command(visible_alias = "c")]
    Categories,

    /// List the entries of an existing archive.
    #[command(visible_alias = "i")]
    Inspect(inspect::InspectArgs),

    /// Manage configuration.
    Config(config_cmd::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Every requested category was exported.
    Success = 0,
    /// Fatal error, no archive written.
    Error = 1,
    /// Archive written, but at least one category failed.
    PartialFailure = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("complist=debug,info")
    } else {
        EnvFilter::new("complist=warn")
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

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Export(args)) => export::run(args, &cli).await,
        Some(Commands::Categories) => categories::run(&cli).await,
        Some(Commands::Inspect(args)) => inspect::run(args, &cli).await,
        Some(Commands::Config(args)) => config_cmd::run(args, &cli).await,
        None => export::run(&export::ExportArgs::default(), &cli).await,
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}

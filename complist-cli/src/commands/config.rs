//! Config command - manage configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use crate::config::{default_config_path, AppConfig, FileConfig};
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show effective configuration (token redacted).
    Show,

    /// Show configuration path.
    Path,

    /// Write a template config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await?,
        ConfigAction::Path => show_path(cli).await?,
        ConfigAction::Init { force } => init_config(*force, cli).await?,
    }
    Ok(ExitCode::Success)
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = AppConfig::load(cli).await?;

    match cli.format {
        OutputFormat::Text => {
            let file = &config.file;
            println!("complist Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config file:  {}", config.path.display());
            println!("Base URL:     {}", file.base_url.as_deref().unwrap_or("(not set)"));
            println!(
                "Token:        {}",
                if config.token().is_ok() { "********" } else { "(not set)" }
            );
            println!(
                "Company id:   {}",
                config
                    .company_id()
                    .map_or_else(|| "(discover or unscoped)".to_string(), ToString::to_string)
            );
            println!("Timeout:      {}s", file.timeout_secs);
            println!("Page size:    {}", file.page_size);
            println!("Archive name: {}", file.archive_name);
            println!();
            println!("Categories:");
            for (category, section) in &file.categories {
                println!(
                    "  • {:<14} {} {} (limit {})",
                    category.id(),
                    section.method,
                    section.endpoint.as_deref().unwrap_or("(no endpoint)"),
                    section.limit
                );
            }
            if let Some(lookup) = &file.table_group_endpoint {
                println!("  • {:<14} {} {}", "table_groups", lookup.method, lookup.path);
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config.redacted())?);
        }
    }

    Ok(())
}

async fn show_path(cli: &Cli) -> Result<()> {
    let path = config_path(cli);
    let exists = tokio::fs::try_exists(&path).await.unwrap_or(false);

    match cli.format {
        OutputFormat::Text => {
            println!(
                "{}{}",
                path.display(),
                if exists { "" } else { " (not created)" }
            );
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_file": path.display().to_string(),
                "exists": exists,
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = config_path(cli);
    FileConfig::template().save(&path, force).await?;
    info!(path = %path.display(), "Wrote config template");

    if !cli.quiet {
        println!("Wrote {}", path.display());
        println!("Edit base_url and the endpoints, then run `complist export`.");
    }
    Ok(())
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(default_config_path)
}

//! Categories command - list exportable categories.

use anyhow::Result;
use complist_categories::{CategoryDescriptor, CategoryRegistry};
use tracing::info;

use crate::config::AppConfig;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the categories command.
pub async fn run(cli: &Cli) -> Result<ExitCode> {
    info!("Listing categories");

    let config = AppConfig::load(cli).await?;
    let entries: Vec<(CategoryDescriptor, bool)> = CategoryRegistry::all()
        .iter()
        .map(|desc| (*desc, config.category_spec(desc.category, None).is_ok()))
        .collect();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_categories_header());
            println!("{}", "─".repeat(60));

            for (desc, configured) in &entries {
                println!("{}", formatter.format_category_line(desc, *configured));
            }

            println!();
            println!(
                "Total: {} categories ({} configured)",
                entries.len(),
                entries.iter().filter(|(_, configured)| *configured).count()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_categories(&entries)?);
        }
    }

    Ok(ExitCode::Success)
}

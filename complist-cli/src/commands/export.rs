//! Export command - fetch categories and write the archive.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use complist_categories::CategoryRegistry;
use complist_core::{Category, DateRange};
use complist_export::Exporter;
use complist_fetch::{
    resolve_company_id, CategoryOutcome, CategorySpec, FetchContext, ProgressObserver, RunStage,
};
use tracing::{debug, info};

use crate::config::{AppConfig, ConfigError};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the export command.
#[derive(Args, Default)]
pub struct ExportArgs {
    /// Categories to export (comma-separated, or "all").
    /// Defaults to every category with a configured endpoint.
    #[arg(long, short, value_delimiter = ',')]
    pub category: Vec<String>,

    /// Maximum single-form records.
    #[arg(long)]
    pub limit_single_form: Option<usize>,

    /// Maximum multi-form records.
    #[arg(long)]
    pub limit_multi_form: Option<usize>,

    /// Maximum data-manager records per table group.
    #[arg(long)]
    pub limit_data_manager: Option<usize>,

    /// Maximum automation records.
    #[arg(long)]
    pub limit_automations: Option<usize>,

    /// Keep records updated on or after this day (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub start: Option<String>,

    /// Keep records updated on or before this day (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub end: Option<String>,

    /// Archive path (defaults to archive_name from the config).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    fn limit_for(&self, category: Category) -> Option<usize> {
        match category {
            Category::SingleForm => self.limit_single_form,
            Category::MultiForm => self.limit_multi_form,
            Category::DataManager => self.limit_data_manager,
            Category::Automations => self.limit_automations,
        }
    }
}

/// Runs the export command.
pub async fn run(args: &ExportArgs, cli: &Cli) -> Result<ExitCode> {
    let config = AppConfig::load(cli).await?;
    let range = DateRange::parse(args.start.as_deref(), args.end.as_deref())?;

    let specs = category_specs(&config, args)?;
    info!(categories = specs.len(), "Starting export");

    let ctx = scoped_context(&config, config.fetch_context(range)?).await?;

    let exporter = Exporter::new(CategoryRegistry::build_pipeline(specs));
    let mut progress = StderrProgress::new(cli);
    let bundle = exporter.run_with(&ctx, &mut progress).await?;

    let archive = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.file.archive_name));
    bundle
        .save(&archive)
        .await
        .with_context(|| format!("Failed to write {}", archive.display()))?;

    let report = &bundle.report;
    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                let formatter = TextFormatter::new(!cli.no_color);
                println!("{}", formatter.format_report(report, &archive));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(report, &archive)?);
        }
    }

    if report.is_complete() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::PartialFailure)
    }
}

/// Resolves the requested categories into fetch specs.
///
/// An explicit selection must be fully configured. Without one, categories
/// lacking an endpoint are skipped.
fn category_specs(config: &AppConfig, args: &ExportArgs) -> Result<Vec<(Category, CategorySpec)>> {
    if args.category.is_empty() {
        let specs: Vec<_> = Category::all()
            .iter()
            .filter_map(|&category| match config.category_spec(category, args.limit_for(category)) {
                Ok(spec) => Some((category, spec)),
                Err(e) => {
                    debug!(category = %category, error = %e, "Skipping category");
                    None
                }
            })
            .collect();
        if specs.is_empty() {
            bail!(
                "No category has an endpoint configured (see `complist config init`, file: {})",
                config.path.display()
            );
        }
        return Ok(specs);
    }

    let selection = Category::parse_selection(&args.category.join(","))?;
    if selection.is_empty() {
        bail!("No categories selected");
    }
    let specs = selection
        .into_iter()
        .map(|category| {
            let spec = config.category_spec(category, args.limit_for(category))?;
            Ok((category, spec))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(specs)
}

/// Applies the configured company id, or discovers one.
async fn scoped_context(config: &AppConfig, ctx: FetchContext) -> Result<FetchContext> {
    if ctx.settings.company_id.is_some() {
        return Ok(ctx);
    }
    let Some(endpoint) = config.file.application_pages_endpoint.as_deref() else {
        debug!("No company id configured, listings are not company-scoped");
        return Ok(ctx);
    };

    let company_id = resolve_company_id(&ctx.http, endpoint)
        .await
        .context("Company id discovery failed")?;
    Ok(ctx.with_company_id(company_id))
}

// ============================================================================
// Progress
// ============================================================================

/// Writes stage changes and category results to stderr.
struct StderrProgress {
    formatter: TextFormatter,
    enabled: bool,
}

impl StderrProgress {
    fn new(cli: &Cli) -> Self {
        Self {
            formatter: TextFormatter::new(!cli.no_color),
            enabled: !cli.quiet,
        }
    }
}

impl ProgressObserver for StderrProgress {
    fn on_stage(&mut self, stage: &RunStage) {
        if !self.enabled {
            return;
        }
        if let Some(line) = self.formatter.format_stage(stage) {
            eprintln!("{line}");
        }
    }

    fn on_outcome(&mut self, outcome: &CategoryOutcome) {
        if self.enabled {
            eprintln!("{}", self.formatter.format_outcome(outcome));
        }
    }
}

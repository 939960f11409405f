//! Run orchestration: fetch, filter, export.
//!
//! One run walks the stages `Idle -> Fetching -> Filtering -> ... ->
//! Exporting -> Done` exactly once. Category failures are recorded in the
//! report; only an export failure ends the run with an error.

use std::path::Path;

use complist_fetch::{FetchContext, FetchPipeline, NoProgress, ProgressObserver, RunStage};
use tracing::{info, instrument, warn};

use crate::archive::{build_archive, save_archive};
use crate::error::ExportError;
use crate::report::ExportReport;

/// The result of a run: archive bytes and the per-category report.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    /// Zip archive bytes.
    pub archive: Vec<u8>,
    /// Per-category summary.
    pub report: ExportReport,
}

impl ExportBundle {
    /// Writes the archive to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] on filesystem failures.
    pub async fn save(&self, path: &Path) -> Result<(), ExportError> {
        save_archive(path, &self.archive).await
    }
}

/// Runs a fetch pipeline and packages the results.
pub struct Exporter {
    pipeline: FetchPipeline,
}

impl Exporter {
    /// Creates an exporter for a pipeline.
    pub fn new(pipeline: FetchPipeline) -> Self {
        Self { pipeline }
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> &FetchPipeline {
        &self.pipeline
    }

    /// Runs without progress reporting.
    ///
    /// # Errors
    ///
    /// Returns an error only if the archive cannot be built.
    pub async fn run(&self, ctx: &FetchContext) -> Result<ExportBundle, ExportError> {
        self.run_with(ctx, &mut NoProgress).await
    }

    /// Runs, reporting each stage to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the archive cannot be built.
    #[instrument(skip_all, fields(categories = self.pipeline.len()))]
    pub async fn run_with(
        &self,
        ctx: &FetchContext,
        observer: &mut dyn ProgressObserver,
    ) -> Result<ExportBundle, ExportError> {
        let outcomes = self.pipeline.execute_with(ctx, observer).await;

        observer.on_stage(&RunStage::Exporting);
        let archive = build_archive(
            outcomes
                .iter()
                .map(|outcome| (outcome.category, outcome.records())),
        )?;
        let report = ExportReport::from_outcomes(&outcomes, &ctx.settings.date_range);

        for failed in report.failures() {
            warn!(category = %failed.category, error = ?failed.error, "Category missing from archive");
        }
        info!(
            files = report.files().len(),
            records = report.total_exported(),
            bytes = archive.len(),
            "Export finished"
        );

        observer.on_stage(&RunStage::Done);
        Ok(ExportBundle { archive, report })
    }
}

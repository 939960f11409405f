//! Fetch pipeline for running category fetchers in order.
//!
//! The pipeline runs each configured fetcher once, in category order, and
//! applies the date filter to what comes back. A failing category yields an
//! empty outcome carrying its error; the remaining categories still run.

use std::fmt;
use std::time::{Duration, Instant};

use complist_core::{Category, ComponentRecord};
use tracing::{debug, info, instrument, warn};

use crate::context::{CategorySpec, FetchContext};
use crate::error::CategoryFetchError;
use crate::fetcher::CategoryFetcher;

// ============================================================================
// Run Stage
// ============================================================================

/// Progress of one run. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Nothing started yet.
    Idle,
    /// Waiting on the category's endpoint.
    Fetching(Category),
    /// Applying the date filter to the category's records.
    Filtering(Category),
    /// Writing CSV files and the archive.
    Exporting,
    /// Finished.
    Done,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Fetching(c) => write!(f, "fetching {}", c.display_name()),
            Self::Filtering(c) => write!(f, "filtering {}", c.display_name()),
            Self::Exporting => f.write_str("exporting"),
            Self::Done => f.write_str("done"),
        }
    }
}

/// Receives progress notifications. Informational only.
pub trait ProgressObserver: Send {
    /// Called when the run enters a stage.
    fn on_stage(&mut self, _stage: &RunStage) {}

    /// Called when a category has finished, successfully or not.
    fn on_outcome(&mut self, _outcome: &CategoryOutcome) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

// ============================================================================
// Category Outcome
// ============================================================================

/// The outcome of one category.
#[derive(Debug)]
pub struct CategoryOutcome {
    /// The category.
    pub category: Category,
    /// Filtered records, or the failure.
    pub result: Result<Vec<ComponentRecord>, CategoryFetchError>,
    /// Records fetched before filtering.
    pub fetched: usize,
    /// Time spent on this category.
    pub duration: Duration,
}

impl CategoryOutcome {
    /// Returns true if the fetch succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the filtered records (empty on failure).
    pub fn records(&self) -> &[ComponentRecord] {
        self.result.as_deref().unwrap_or(&[])
    }

    /// Returns the number of records that survived filtering.
    pub fn count(&self) -> usize {
        self.records().len()
    }

    /// Returns the failure, if any.
    pub fn error(&self) -> Option<&CategoryFetchError> {
        self.result.as_ref().err()
    }
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

struct FetchJob {
    fetcher: Box<dyn CategoryFetcher>,
    spec: CategorySpec,
}

/// Category fetchers executed in category order.
#[derive(Default)]
pub struct FetchPipeline {
    jobs: Vec<FetchJob>,
}

impl FetchPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fetcher. A fetcher already present for the same category is
    /// replaced.
    pub fn add(&mut self, fetcher: Box<dyn CategoryFetcher>, spec: CategorySpec) {
        let category = fetcher.category();
        self.jobs.retain(|job| job.fetcher.category() != category);
        self.jobs.push(FetchJob { fetcher, spec });
        self.jobs.sort_by_key(|job| job.fetcher.category());
    }

    /// Returns the number of categories in the pipeline.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns the categories in execution order.
    pub fn categories(&self) -> Vec<Category> {
        self.jobs.iter().map(|job| job.fetcher.category()).collect()
    }

    /// Runs every fetcher and filters the results.
    pub async fn execute(&self, ctx: &FetchContext) -> Vec<CategoryOutcome> {
        self.execute_with(ctx, &mut NoProgress).await
    }

    /// Runs every fetcher and filters the results, reporting progress.
    #[instrument(skip(self, ctx, observer), fields(categories = self.jobs.len()))]
    pub async fn execute_with(
        &self,
        ctx: &FetchContext,
        observer: &mut dyn ProgressObserver,
    ) -> Vec<CategoryOutcome> {
        observer.on_stage(&RunStage::Idle);
        info!(count = self.jobs.len(), "Executing fetch pipeline");

        let mut outcomes = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            let category = job.fetcher.category();
            let start = Instant::now();

            observer.on_stage(&RunStage::Fetching(category));
            debug!(category = %category, endpoint = %job.spec.endpoint.path, "Fetching category");

            let outcome = match job.fetcher.fetch(ctx, &job.spec).await {
                Ok(records) => {
                    let fetched = records.len();
                    observer.on_stage(&RunStage::Filtering(category));
                    let kept = ctx.settings.date_range.filter(records);
                    info!(
                        category = %category,
                        fetched,
                        kept = kept.len(),
                        duration = ?start.elapsed(),
                        "Category fetched"
                    );
                    CategoryOutcome {
                        category,
                        result: Ok(kept),
                        fetched,
                        duration: start.elapsed(),
                    }
                }
                Err(error) => {
                    warn!(category = %category, error = %error, "Category fetch failed");
                    CategoryOutcome {
                        category,
                        result: Err(CategoryFetchError::new(category, error)),
                        fetched: 0,
                        duration: start.elapsed(),
                    }
                }
            };

            observer.on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }
}

// ============================================================================
// Tests
// ============================================================================

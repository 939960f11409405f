//! Per-category export summary.

use chrono::{DateTime, Utc};
use complist_core::{Category, DateRange};
use complist_fetch::{CategoryOutcome, FetchError};
use serde::{Deserialize, Serialize};

/// Broad cause of a category failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The platform could not be reached or answered with an error status.
    Network,
    /// The platform answered, but not with something usable.
    Response,
}

impl FailureKind {
    /// Classifies a fetch error.
    pub fn of(error: &FetchError) -> Self {
        if error.is_transport() {
            Self::Network
        } else {
            Self::Response
        }
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Response => "response",
        }
    }
}

/// Summary of one category in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// The category.
    pub category: Category,
    /// Records fetched before filtering.
    pub fetched: usize,
    /// Records written to the archive.
    pub exported: usize,
    /// Failure message, if the category failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Cause of the failure, if the category failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Archive entry name, if the category produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Time spent fetching, in milliseconds.
    pub duration_ms: u64,
}

impl CategorySummary {
    /// Summarizes a fetch outcome.
    pub fn from_outcome(outcome: &CategoryOutcome) -> Self {
        let exported = outcome.count();
        Self {
            category: outcome.category,
            fetched: outcome.fetched,
            exported,
            error: outcome.error().map(|e| e.source.to_string()),
            failure: outcome.error().map(|e| FailureKind::of(&e.source)),
            file: (exported > 0).then(|| outcome.category.file_name()),
            duration_ms: u64::try_from(outcome.duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns true if the category failed.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Lower date bound that was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Upper date bound that was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// One entry per requested category, in processing order.
    pub categories: Vec<CategorySummary>,
}

impl ExportReport {
    /// Builds a report from fetch outcomes.
    pub fn from_outcomes(outcomes: &[CategoryOutcome], range: &DateRange) -> Self {
        Self {
            generated_at: Utc::now(),
            start: range.start(),
            end: range.end(),
            categories: outcomes.iter().map(CategorySummary::from_outcome).collect(),
        }
    }

    /// Returns the summary for a category, if it was requested.
    pub fn get(&self, category: Category) -> Option<&CategorySummary> {
        self.categories.iter().find(|s| s.category == category)
    }

    /// Returns the failed categories.
    pub fn failures(&self) -> impl Iterator<Item = &CategorySummary> {
        self.categories.iter().filter(|s| s.is_failure())
    }

    /// Returns true if no category failed.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Returns the number of exported records across all categories.
    pub fn total_exported(&self) -> usize {
        self.categories.iter().map(|s| s.exported).sum()
    }

    /// Returns the archive entry names, in archive order.
    pub fn files(&self) -> Vec<&str> {
        self.categories.iter().filter_map(|s| s.file.as_deref()).collect()
    }
}

//! JSON output formatting.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use complist_categories::CategoryDescriptor;
use complist_export::{ArchiveFile, CategorySummary, ExportReport, FailureKind};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for an export run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub archive: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub end: Option<DateTime<Utc>>,
    pub complete: bool,
    pub total_exported: usize,
    pub categories: Vec<CategoryOutput>,
}

/// One category of an export run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOutput {
    pub category: String,
    pub status: String,
    pub fetched: usize,
    pub exported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    pub duration_ms: u64,
}

/// Category info output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfoOutput {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub file_name: String,
    pub paginated: bool,
    pub needs_lookup: bool,
    pub configured: bool,
}

/// Archive entry output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntryOutput {
    pub name: String,
    pub rows: usize,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats an export report.
    pub fn format_report(&self, report: &ExportReport, archive: &Path) -> Result<String> {
        self.format(&Self::report_to_output(report, archive))
    }

    fn report_to_output(report: &ExportReport, archive: &Path) -> ExportOutput {
        ExportOutput {
            archive: archive.display().to_string(),
            generated_at: report.generated_at,
            start: report.start,
            end: report.end,
            complete: report.is_complete(),
            total_exported: report.total_exported(),
            categories: report.categories.iter().map(Self::summary_to_output).collect(),
        }
    }

    fn summary_to_output(summary: &CategorySummary) -> CategoryOutput {
        let status = if summary.is_failure() {
            "error"
        } else if summary.exported == 0 {
            "empty"
        } else {
            "ok"
        };

        CategoryOutput {
            category: summary.category.id().to_string(),
            status: status.to_string(),
            fetched: summary.fetched,
            exported: summary.exported,
            file: summary.file.clone(),
            error: summary.error.clone(),
            error_kind: summary.failure,
            duration_ms: summary.duration_ms,
        }
    }

    /// Formats the category list.
    pub fn format_categories(
        &self,
        categories: &[(CategoryDescriptor, bool)],
    ) -> Result<String> {
        let outputs: Vec<CategoryInfoOutput> = categories
            .iter()
            .map(|(desc, configured)| CategoryInfoOutput {
                id: desc.category.id().to_string(),
                display_name: desc.category.display_name().to_string(),
                description: desc.description.to_string(),
                file_name: desc.category.file_name(),
                paginated: desc.paginated,
                needs_lookup: desc.needs_lookup,
                configured: *configured,
            })
            .collect();

        self.format(&outputs)
    }

    /// Formats archive contents.
    pub fn format_archive(&self, files: &[ArchiveFile]) -> Result<String> {
        let outputs: Vec<ArchiveEntryOutput> = files
            .iter()
            .map(|f| ArchiveEntryOutput {
                name: f.name.clone(),
                rows: f.rows.len(),
            })
            .collect();

        self.format(&outputs)
    }
}

//! Text output formatting with colors.

use std::path::Path;

use complist_categories::CategoryDescriptor;
use complist_export::{ArchiveFile, CategorySummary, ExportReport};
use complist_fetch::{CategoryOutcome, RunStage};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Width of the category name column.
const NAME_WIDTH: usize = 14;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Formats a stage change for the progress stream.
    pub fn format_stage(&self, stage: &RunStage) -> Option<String> {
        match stage {
            RunStage::Fetching(category) => Some(format!(
                "{} {}...",
                self.dim("Fetching"),
                category.display_name()
            )),
            RunStage::Exporting => Some(self.dim("Writing archive...")),
            RunStage::Idle | RunStage::Filtering(_) | RunStage::Done => None,
        }
    }

    /// Formats a finished category for the progress stream.
    pub fn format_outcome(&self, outcome: &CategoryOutcome) -> String {
        let name = outcome.category.display_name();
        match outcome.error() {
            Some(err) => format!("  {} {}: {}", self.red("✗"), name, err.source),
            None if outcome.count() == outcome.fetched => {
                format!("  {} {}: {} records", self.green("✓"), name, outcome.count())
            }
            None => format!(
                "  {} {}: {} records ({} fetched)",
                self.green("✓"),
                name,
                outcome.count(),
                outcome.fetched
            ),
        }
    }

    // ========================================================================
    // Export Summary
    // ========================================================================

    /// Formats the export summary.
    pub fn format_report(&self, report: &ExportReport, archive: &Path) -> String {
        let mut lines = Vec::new();

        lines.push(self.bold("Export Summary"));
        lines.push("─".repeat(40));

        if report.start.is_some() || report.end.is_some() {
            let bound = |b: Option<chrono::DateTime<chrono::Utc>>| {
                b.map_or_else(|| "…".to_string(), |d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            };
            lines.push(self.dim(&format!(
                "Updated between {} and {} (UTC)",
                bound(report.start),
                bound(report.end)
            )));
        }

        for summary in &report.categories {
            lines.push(self.format_summary_line(summary));
        }

        lines.push(String::new());
        let files = report.files();
        if files.is_empty() {
            lines.push(format!(
                "Archive: {} {}",
                archive.display(),
                self.yellow("(no records, archive is empty)")
            ));
        } else {
            lines.push(format!(
                "Archive: {} ({} file{}, {} records)",
                archive.display(),
                files.len(),
                if files.len() == 1 { "" } else { "s" },
                report.total_exported()
            ));
        }

        let failed = report.failures().count();
        if failed > 0 {
            lines.push(self.red(&format!(
                "{failed} categor{} failed and {} missing from the archive",
                if failed == 1 { "y" } else { "ies" },
                if failed == 1 { "is" } else { "are" }
            )));
        }

        lines.join("\n")
    }

    fn format_summary_line(&self, summary: &CategorySummary) -> String {
        let name = format!("{:<NAME_WIDTH$}", summary.category.display_name());
        match &summary.error {
            Some(err) => match summary.failure {
                Some(kind) => format!(
                    "{} {} {} {}",
                    name,
                    self.red("FAILED"),
                    self.yellow(&format!("[{}]", kind.label())),
                    self.dim(err)
                ),
                None => format!("{} {} {}", name, self.red("FAILED"), self.dim(err)),
            },
            None if summary.exported == 0 => format!("{} {}", name, self.dim("0 (omitted)")),
            None => format!(
                "{} {:>6}  {}",
                name,
                summary.exported,
                self.dim(summary.file.as_deref().unwrap_or_default())
            ),
        }
    }

    // ========================================================================
    // Categories & Archives
    // ========================================================================

    /// Formats the category list header.
    pub fn format_categories_header(&self) -> String {
        format!(
            "{} {} {} {}",
            self.bold(&format!("{:<NAME_WIDTH$}", "Category")),
            self.bold(&format!("{:<14}", "Identifier")),
            self.bold(&format!("{:<12}", "Configured")),
            self.bold("File")
        )
    }

    /// Formats a single category line.
    pub fn format_category_line(&self, desc: &CategoryDescriptor, configured: bool) -> String {
        let status = if configured {
            self.green(&format!("{:<12}", "✓"))
        } else {
            self.dim(&format!("{:<12}", "−"))
        };
        format!(
            "{:<NAME_WIDTH$} {:<14} {} {}",
            desc.category.display_name(),
            desc.category.id(),
            status,
            desc.category.file_name()
        )
    }

    /// Formats the contents of an archive.
    pub fn format_archive(&self, path: &Path, files: &[ArchiveFile]) -> String {
        let mut lines = vec![self.bold(&path.display().to_string()), "─".repeat(40)];

        if files.is_empty() {
            lines.push(self.dim("(empty archive)"));
        }
        for file in files {
            lines.push(format!("{:<20} {:>6} rows", file.name, file.rows.len()));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

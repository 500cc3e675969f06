//! Engine types
//!
//! Jobs, per-job reports and batch outcomes.

use crate::columns::ResultTable;
use crate::output::CsvExportOptions;
use serde::Serialize;
use std::path::PathBuf;

/// Default `$top` for column requests
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// One list to inspect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Site URL, e.g. `https://contoso.sharepoint.com/sites/TeamA`
    pub site_url: String,
    /// List display name
    pub list_title: String,
    /// Columns to keep, by internal or display name (`None` keeps all)
    pub columns: Option<Vec<String>>,
    /// CSV export settings (`None` skips the export)
    pub export: Option<CsvExportOptions>,
}

impl Job {
    /// Create a job selecting every column, without export
    pub fn new(site_url: impl Into<String>, list_title: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            list_title: list_title.into(),
            columns: None,
            export: None,
        }
    }

    /// Keep only the named columns
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Export the table to CSV
    #[must_use]
    pub fn with_export(mut self, export: CsvExportOptions) -> Self {
        self.export = Some(export);
        self
    }
}

/// How a job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Rows present and every requested column found
    Succeeded,
    /// Some requested columns were not found
    Partially,
    /// The list has no columns, or none were selected
    Empty,
    /// The job raised an error
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Succeeded => "succeeded",
            JobStatus::Partially => "partially",
            JobStatus::Empty => "empty",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a job that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub site_url: String,
    pub list_title: String,
    /// Columns returned by Graph, before selection
    pub total_columns: usize,
    /// Rows after selection
    pub table: ResultTable,
    /// Requested columns that were not found
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Where the CSV was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
    pub status: JobStatus,
}

impl JobReport {
    /// Status derived from row and missing counts
    pub fn derive_status(table: &ResultTable, missing: &[String]) -> JobStatus {
        if !missing.is_empty() {
            JobStatus::Partially
        } else if table.is_empty() {
            JobStatus::Empty
        } else {
            JobStatus::Succeeded
        }
    }
}

/// Outcome of one job in a batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOutcome {
    pub site_url: String,
    pub list_title: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<JobReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl JobOutcome {
    /// Check if the job failed
    pub fn is_failed(&self) -> bool {
        self.status == JobStatus::Failed
    }

    /// One-line summary for console output
    pub fn summary_line(&self) -> String {
        let target = format!("{} | {}", self.site_url, self.list_title);
        match (&self.report, &self.error) {
            (_, Some(error)) => format!("[{}] {target}: {error}", self.status),
            (Some(report), None) => {
                let mut line = format!(
                    "[{}] {target}: {} of {} columns",
                    self.status,
                    report.table.len(),
                    report.total_columns
                );
                if !report.missing.is_empty() {
                    line.push_str(&format!(", missing: {}", report.missing.join(", ")));
                }
                if let Some(path) = &report.csv_path {
                    line.push_str(&format!(", csv: {}", path.display()));
                }
                line
            }
            (None, None) => format!("[{}] {target}", self.status),
        }
    }
}

/// Totals over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub jobs: usize,
    pub succeeded: usize,
    pub partially: usize,
    pub empty: usize,
    pub failed: usize,
}

impl BatchStats {
    /// Count outcomes by status
    pub fn from_outcomes(outcomes: &[JobOutcome]) -> Self {
        let mut stats = Self {
            jobs: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.status {
                JobStatus::Succeeded => stats.succeeded += 1,
                JobStatus::Partially => stats.partially += 1,
                JobStatus::Empty => stats.empty += 1,
                JobStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

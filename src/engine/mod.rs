//! Execution engine module
//!
//! Fetch, normalize, select and export pipeline.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ColumnsPipeline` - Runs jobs against a Graph client
//! - `Job` - One site/list pair with optional selection and export
//! - `JobReport` / `JobOutcome` - Per-job results, isolated in batches

mod types;

pub use types::{BatchStats, Job, JobOutcome, JobReport, JobStatus, DEFAULT_PAGE_SIZE};

use crate::columns::{build_table, ResultTable};
use crate::error::Result;
use crate::http::GraphClient;
use crate::output::write_csv;
use crate::sharepoint::{columns_url, SiteRef};
use std::time::Instant;
use tracing::{error, info, warn};

/// Column inspection pipeline over a Graph client
pub struct ColumnsPipeline {
    client: GraphClient,
    page_size: u32,
}

impl ColumnsPipeline {
    /// Create a pipeline with the default page size
    pub fn new(client: GraphClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the `$top` sent with the first page request
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Get the Graph client
    pub fn client(&self) -> &GraphClient {
        &self.client
    }

    /// Fetch every column of a list and normalize it
    pub async fn fetch_table(&self, site: &SiteRef, list_title: &str) -> Result<ResultTable> {
        let url = columns_url(&self.client.config().base_url, site, list_title);
        info!("Fetching columns of '{}' on {}", list_title, site);

        let items = self.client.fetch_all_pages(&url, Some(self.page_size)).await?;
        Ok(build_table(items))
    }

    /// Run one job
    pub async fn run(&self, job: &Job) -> Result<JobReport> {
        let site = SiteRef::parse(&job.site_url)?;
        let table = self.fetch_table(&site, &job.list_title).await?;
        let total_columns = table.len();

        let (table, missing) = match &job.columns {
            Some(names) => {
                let selection = table.select(names);
                if !selection.missing.is_empty() {
                    warn!(
                        "Columns not found in '{}': {}",
                        job.list_title,
                        selection.missing.join(", ")
                    );
                }
                (selection.table, selection.missing)
            }
            None => (table, Vec::new()),
        };

        let csv_path = match &job.export {
            Some(options) => {
                let path = options.path_for(site.token(), &job.list_title);
                Some(write_csv(&table, &path, options.overwrite)?)
            }
            None => None,
        };

        let status = JobReport::derive_status(&table, &missing);
        info!(
            "Job '{}' finished: {} ({} of {} columns)",
            job.list_title,
            status,
            table.len(),
            total_columns
        );

        Ok(JobReport {
            site_url: job.site_url.clone(),
            list_title: job.list_title.clone(),
            total_columns,
            table,
            missing,
            csv_path,
            status,
        })
    }

    /// Run jobs one after another; a failing job does not stop the rest
    pub async fn run_batch(&self, jobs: &[Job]) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.iter().enumerate() {
            info!(
                "Job {}/{}: '{}' on {}",
                index + 1,
                jobs.len(),
                job.list_title,
                job.site_url
            );
            let start = Instant::now();
            let result = self.run(job).await;
            let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let outcome = match result {
                Ok(report) => JobOutcome {
                    site_url: job.site_url.clone(),
                    list_title: job.list_title.clone(),
                    status: report.status,
                    report: Some(report),
                    error: None,
                    duration_ms,
                },
                Err(e) => {
                    error!("Job '{}' failed: {}", job.list_title, e);
                    JobOutcome {
                        site_url: job.site_url.clone(),
                        list_title: job.list_title.clone(),
                        status: JobStatus::Failed,
                        report: None,
                        error: Some(e.to_string()),
                        duration_ms,
                    }
                }
            };
            outcomes.push(outcome);
        }

        let stats = BatchStats::from_outcomes(&outcomes);
        info!(
            "Batch finished: {} jobs, {} succeeded, {} partially, {} empty, {} failed",
            stats.jobs, stats.succeeded, stats.partially, stats.empty, stats.failed
        );
        outcomes
    }
}

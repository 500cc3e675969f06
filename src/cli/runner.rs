//! CLI runner - executes commands

use crate::auth::TokenProviderConfig;
use crate::cli::commands::{Cli, Commands};
use crate::config::{parse_column_list, Credentials, JobFile, DEFAULT_ENV_PREFIX};
use crate::engine::{ColumnsPipeline, Job, JobReport};
use crate::error::{Error, Result};
use crate::http::{GraphClient, GraphClientConfig, RateLimiterConfig};
use crate::output::{render_json, render_table, CsvExportOptions};
use crate::types::OutputFormat;
use std::time::Duration;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    ///
    /// Returns the process exit code: 1 when any batch job failed, else 0.
    pub async fn run(&self) -> Result<i32> {
        match &self.cli.command {
            Commands::Columns {
                site,
                list,
                columns,
                export,
                output_dir,
                no_timestamp,
                overwrite,
            } => {
                let mut job = Job::new(site.as_str(), list.as_str());
                job.columns = parse_column_list(columns);
                if *export {
                    job.export = Some(CsvExportOptions {
                        output_dir: output_dir.clone(),
                        timestamp: !*no_timestamp,
                        overwrite: *overwrite,
                    });
                }
                self.columns(&job).await
            }
            Commands::Batch { jobs } => {
                let jobs = JobFile::load(jobs)?.into_jobs()?;
                self.batch(&jobs).await
            }
        }
    }

    /// Load credentials from the environment or the credential file
    ///
    /// Runs before any network call so configuration problems fail fast.
    fn load_credentials(&self) -> Result<Credentials> {
        if self.cli.env {
            debug!("Reading credentials from {}* variables", DEFAULT_ENV_PREFIX);
            Credentials::from_env(DEFAULT_ENV_PREFIX)
        } else {
            debug!(
                "Reading credentials from {} [{}]",
                self.cli.config.display(),
                self.cli.section
            );
            Credentials::from_json_file(&self.cli.config, &self.cli.section)
        }
    }

    /// Build the pipeline from global flags
    fn build_pipeline(&self) -> Result<ColumnsPipeline> {
        let credentials = self.load_credentials()?;

        let mut builder = GraphClientConfig::builder()
            .base_url(self.cli.graph_base.as_str())
            .timeout(Duration::from_secs(self.cli.timeout.max(1)))
            .max_retries(self.cli.max_retries);
        if let Some(rps) = self.cli.rate_limit {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        let config = builder.build();
        let token_config = TokenProviderConfig::default().authority(self.cli.authority.as_str());

        let client = GraphClient::with_auth(config, credentials, token_config)?;
        Ok(ColumnsPipeline::new(client).with_page_size(self.cli.page_size))
    }

    async fn columns(&self, job: &Job) -> Result<i32> {
        let pipeline = self.build_pipeline()?;
        let report = pipeline.run(job).await?;
        self.print_report(&report)?;
        Ok(0)
    }

    async fn batch(&self, jobs: &[Job]) -> Result<i32> {
        if jobs.is_empty() {
            return Err(Error::config("Job file contains no jobs"));
        }

        let pipeline = self.build_pipeline()?;
        let outcomes = pipeline.run_batch(jobs).await;

        match self.cli.format {
            OutputFormat::Json => println!("{}", render_json(&outcomes)?),
            OutputFormat::Table => {
                for outcome in &outcomes {
                    println!("{}", outcome.summary_line());
                }
            }
        }

        Ok(i32::from(outcomes.iter().any(|o| o.is_failed())))
    }

    fn print_report(&self, report: &JobReport) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", render_json(report)?),
            OutputFormat::Table => {
                print!("{}", render_table(&report.table));
                println!(
                    "\n{} of {} columns ({})",
                    report.table.len(),
                    report.total_columns,
                    report.status
                );
                if !report.missing.is_empty() {
                    println!("Not found: {}", report.missing.join(", "));
                }
                if let Some(path) = &report.csv_path {
                    println!("CSV: {}", path.display());
                }
            }
        }
        Ok(())
    }
}

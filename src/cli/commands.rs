//! CLI commands and argument parsing

use crate::types::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect the columns of SharePoint lists through Microsoft Graph
#[derive(Parser, Debug)]
#[command(name = "graph-columns")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Credential file (JSON)
    #[arg(short = 'C', long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    /// Section of the credential file holding tenant_id, client_id and client_secret
    #[arg(long, global = true, default_value = crate::config::DEFAULT_SECTION)]
    pub section: String,

    /// Read credentials from GRAPH_TENANT_ID, GRAPH_CLIENT_ID and GRAPH_CLIENT_SECRET
    #[arg(long, global = true)]
    pub env: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Columns requested per page
    #[arg(long, global = true, default_value_t = crate::engine::DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Retries on 429/5xx before giving up
    #[arg(long, global = true, default_value_t = 5)]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout: u64,

    /// Cap outgoing Graph requests per second (client-side)
    #[arg(long, global = true)]
    pub rate_limit: Option<u32>,

    /// Graph base URL
    #[arg(long, global = true, default_value = crate::http::GRAPH_BASE_URL)]
    pub graph_base: String,

    /// Identity platform authority
    #[arg(long, global = true, default_value = crate::auth::DEFAULT_AUTHORITY)]
    pub authority: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the columns of one list
    Columns {
        /// Site URL, e.g. https://contoso.sharepoint.com/sites/TeamA
        #[arg(long)]
        site: String,

        /// List display name
        #[arg(long)]
        list: String,

        /// Columns to keep (comma-separated internal or display names, `*` = all)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Write the table to a CSV file
        #[arg(long)]
        export: bool,

        /// Directory for CSV files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Leave the timestamp out of the CSV file name
        #[arg(long)]
        no_timestamp: bool,

        /// Replace an existing CSV file instead of numbering a new one
        #[arg(long)]
        overwrite: bool,
    },

    /// Run every job of a job file
    Batch {
        /// Job file (JSON with `defaults` and `jobs`)
        #[arg(short, long)]
        jobs: PathBuf,
    },
}

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # graph-columns
//!
//! Reads the column definitions of SharePoint lists through Microsoft Graph
//! and turns them into a fixed-shape table.
//!
//! ## Features
//!
//! - **App-only Auth**: Client-credentials token exchange with an in-memory cache
//! - **Resilient Fetching**: Retries 429/5xx honoring `Retry-After`, follows `@odata.nextLink`
//! - **Type Detection**: Facet-based column types with one-line details
//! - **CSV Export**: Sanitized, timestamped, collision-safe file names
//! - **Batch Jobs**: Several lists per run with independent outcomes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graph_columns::auth::TokenProviderConfig;
//! use graph_columns::config::Credentials;
//! use graph_columns::engine::{ColumnsPipeline, Job};
//! use graph_columns::http::{GraphClient, GraphClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> graph_columns::Result<()> {
//!     let credentials = Credentials::from_json_file("config.json", "azuread")?;
//!     let client = GraphClient::with_auth(
//!         GraphClientConfig::default(),
//!         credentials,
//!         TokenProviderConfig::default(),
//!     )?;
//!
//!     let pipeline = ColumnsPipeline::new(client);
//!     let job = Job::new("https://contoso.sharepoint.com/sites/TeamA", "My Custom List");
//!     let report = pipeline.run(&job).await?;
//!
//!     for row in &report.table {
//!         println!("{} {} {}", row.internal_name, row.column_type, row.details);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌────────────────┐   ┌───────────┐   ┌──────────┐
//! │  config  │──▶│   auth   │──▶│      http      │──▶│  columns  │──▶│  output  │
//! │ creds,   │   │ token    │   │ retry, paging, │   │ detect,   │   │ csv,     │
//! │ job file │   │ cache    │   │ rate limit     │   │ table     │   │ console  │
//! └──────────┘   └──────────┘   └────────────────┘   └───────────┘   └──────────┘
//!                          engine: jobs and batches
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and job files
pub mod config;

/// Client-credentials token provider
pub mod auth;

/// Graph HTTP client with retry, paging and rate limiting
pub mod http;

/// SharePoint site and list addressing
pub mod sharepoint;

/// Column type detection and result tables
pub mod columns;

/// CSV export and console rendering
pub mod output;

/// Job pipeline
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use columns::{build_table, ColumnType, NormalizedColumn, ResultTable};
pub use engine::{ColumnsPipeline, Job, JobOutcome, JobReport, JobStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

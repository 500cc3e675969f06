//! Output module
//!
//! Handles CSV export and console rendering of result tables.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Building deterministic, sanitized CSV file names
//! - Picking a free name when the target already exists
//! - Writing CSV files that open cleanly in spreadsheet tools
//! - Rendering tables and reports on the console

mod console;
mod export;

pub use console::{render_json, render_table};
pub use export::{
    build_csv_path, next_free_path, sanitize_for_filename, timestamp_token, write_csv,
    CsvExportOptions,
};

//! CLI module
//!
//! Command-line interface for inspecting list columns.
//!
//! # Commands
//!
//! - `columns` - Show (and optionally export) the columns of one list
//! - `batch` - Run every job of a job file, one after another

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

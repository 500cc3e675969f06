//! CSV export
//!
//! Writes a result table as a spreadsheet-friendly CSV file (UTF-8 with BOM)
//! under a deterministic name: `<site>[_<YYYYMMDD_hhmmss>][_<list>].csv`.

use crate::columns::ResultTable;
use crate::error::{Error, Result};
use regex::Regex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

/// Byte order mark so spreadsheet tools detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Collision suffixes tried before giving up
const MAX_COLLISION_SUFFIX: u32 = 999;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

static REPEATED_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());

/// Where and how a table is exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExportOptions {
    /// Directory the file is written to (created if missing)
    pub output_dir: PathBuf,
    /// Include a `YYYYMMDD_hhmmss` token in the file name
    pub timestamp: bool,
    /// Replace an existing file instead of picking a free name
    pub overwrite: bool,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            timestamp: true,
            overwrite: false,
        }
    }
}

impl CsvExportOptions {
    /// Target path for a site token and list title, stamped with the current local time
    pub fn path_for(&self, site_token: &str, list_title: &str) -> PathBuf {
        let stamp = self.timestamp.then(timestamp_token);
        build_csv_path(
            &self.output_dir,
            site_token,
            Some(list_title),
            stamp.as_deref(),
        )
    }
}

/// Current local time as `YYYYMMDD_hhmmss`
pub fn timestamp_token() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Make a string safe for use in a file name
///
/// Characters outside `[A-Za-z0-9._-]` become `_`, runs of `_` collapse,
/// and leading or trailing `_` are removed. An empty result becomes `NA`.
pub fn sanitize_for_filename(value: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(value.trim(), "_");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        "NA".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build `<dir>/<prefix>[_<timestamp>][_<postfix>].csv`
pub fn build_csv_path(
    dir: &Path,
    prefix: &str,
    postfix: Option<&str>,
    timestamp: Option<&str>,
) -> PathBuf {
    let mut name = sanitize_for_filename(prefix);
    if let Some(ts) = timestamp.filter(|t| !t.is_empty()) {
        name.push('_');
        name.push_str(ts);
    }
    if let Some(post) = postfix {
        name.push('_');
        name.push_str(&sanitize_for_filename(post));
    }
    name.push_str(".csv");
    dir.join(name)
}

/// First of `path`, `<stem>_001.<ext>`, `<stem>_002.<ext>`, ... that does not exist
pub fn next_free_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    for n in 1..=MAX_COLLISION_SUFFIX {
        let candidate = path.with_file_name(format!("{stem}_{n:03}{extension}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(Error::Other(format!(
        "No free file name left for {}",
        path.display()
    )))
}

/// Write a table to `path` and return the path actually written
///
/// Without `overwrite`, an existing file is left alone and a numbered
/// sibling is written instead.
pub fn write_csv(table: &ResultTable, path: &Path, overwrite: bool) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let target = if overwrite {
        path.to_path_buf()
    } else {
        next_free_path(path)?
    };
    debug!("Writing {} rows to {}", table.len(), target.display());

    let mut file = File::create(&target)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(ResultTable::HEADERS)?;
    for row in table {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;

    info!("CSV file exported to: {}", target.display());
    Ok(target)
}

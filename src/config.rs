//! Configuration loading
//!
//! Two inputs are read from disk before any network activity:
//!
//! - the credential file holding the app registration used for the
//!   client-credentials flow, nested under a section key (default `azuread`)
//! - batch job files (`defaults` + `jobs`) for the `batch` command
//!
//! Both fail fast with a configuration error describing what is missing.

use crate::engine::Job;
use crate::error::{Error, Result};
use crate::output::CsvExportOptions;
use crate::types::{JsonObject, JsonValue, OptionStringExt};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default section key inside the credential file
pub const DEFAULT_SECTION: &str = "azuread";

/// Default prefix for credential environment variables
pub const DEFAULT_ENV_PREFIX: &str = "GRAPH_";

// ============================================================================
// Credentials
// ============================================================================

/// App registration credentials for the client-credentials flow
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Directory (tenant) identifier
    pub tenant_id: String,
    /// Application (client) identifier
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
}

impl Credentials {
    /// Build credentials from values, trimming and rejecting empty ones
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let tenant_id: String = tenant_id.into();
        let client_id: String = client_id.into();
        let client_secret: String = client_secret.into();

        let tenant_id = tenant_id
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("tenant_id"))?;
        let client_id = client_id
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("client_id"))?;
        let client_secret = client_secret
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("client_secret"))?;

        Ok(Self {
            tenant_id,
            client_id,
            client_secret,
        })
    }

    /// Load credentials from a JSON file
    ///
    /// ```json
    /// { "azuread": { "tenant_id": "…", "client_id": "…", "client_secret": "…" } }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>, section: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content, section).map_err(|e| match e {
            Error::JsonParse(inner) => Error::config(format!(
                "Failed to parse JSON config at '{}': {inner}",
                path.display()
            )),
            other => other,
        })
    }

    /// Load credentials from JSON text
    pub fn from_json_str(content: &str, section: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(content)?;
        Self::from_value(&value, section)
    }

    /// Extract credentials from a parsed config document
    pub fn from_value(value: &JsonValue, section: &str) -> Result<Self> {
        let block = value
            .get(section)
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::config(format!("Section '{section}' not found in config")))?;

        let field = |key: &str| -> Result<String> {
            match block.get(key) {
                Some(JsonValue::String(s)) => s
                    .clone()
                    .none_if_empty()
                    .ok_or_else(|| Error::missing_field(format!("{section}.{key}"))),
                Some(JsonValue::Null) | None => {
                    Err(Error::missing_field(format!("{section}.{key}")))
                }
                Some(_) => Err(Error::config(format!(
                    "Field '{section}.{key}' must be a string"
                ))),
            }
        };

        Ok(Self {
            tenant_id: field("tenant_id")?,
            client_id: field("client_id")?,
            client_secret: field("client_secret")?,
        })
    }

    /// Load credentials from `<prefix>TENANT_ID`, `<prefix>CLIENT_ID`, `<prefix>CLIENT_SECRET`
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::from_lookup(prefix, |name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| -> Result<String> {
            let name = format!("{prefix}{suffix}");
            lookup(&name)
                .none_if_empty()
                .ok_or_else(|| Error::missing_field(name))
        };

        Ok(Self {
            tenant_id: var("TENANT_ID")?,
            client_id: var("CLIENT_ID")?,
            client_secret: var("CLIENT_SECRET")?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short_client: String = self.client_id.chars().take(6).collect();
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &format!("{short_client}…"))
            .field("client_secret", &"***")
            .finish()
    }
}

// ============================================================================
// Batch Job Files
// ============================================================================

/// Raw job file layout: `defaults` merged under each entry of `jobs`
#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    /// Values applied to every job unless the job overrides them
    #[serde(default)]
    pub defaults: JsonObject,
    /// One object per job
    pub jobs: Vec<JsonObject>,
}

/// A single merged job entry
#[derive(Debug, Clone, Deserialize)]
struct JobEntry {
    #[serde(default)]
    site_url: Option<String>,

    #[serde(default)]
    list_title: Option<String>,

    #[serde(default)]
    columns: Option<ColumnsValue>,

    #[serde(default)]
    export_csv: bool,

    #[serde(default = "default_true")]
    timestamp: bool,

    #[serde(default)]
    overwrite: bool,

    #[serde(default)]
    output_dir: Option<PathBuf>,
}

/// Column selection as written in a job file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ColumnsValue {
    List(Vec<String>),
    Csv(String),
}

fn default_true() -> bool {
    true
}

/// Split a comma-separated column list; `*` or an empty list selects everything
pub fn parse_column_list(names: &[String]) -> Option<Vec<String>> {
    let names: Vec<String> = names
        .iter()
        .flat_map(|n| n.split(','))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect();

    if names.is_empty() || names.iter().any(|n| n == "*") {
        None
    } else {
        Some(names)
    }
}

impl JobFile {
    /// Read and parse a job file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "Job file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse job file text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(content)?;
        if !value.get("jobs").is_some_and(JsonValue::is_array) {
            return Err(Error::config("Job file must contain a 'jobs' array"));
        }
        if value.get("defaults").is_some_and(|d| !d.is_object()) {
            return Err(Error::config("'defaults' must be an object if present"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Merge defaults into every job and validate required keys
    ///
    /// Any invalid job rejects the whole file.
    pub fn into_jobs(self) -> Result<Vec<Job>> {
        self.jobs
            .into_iter()
            .enumerate()
            .map(|(index, job)| {
                let mut merged = canonical_keys(self.defaults.clone());
                merged.extend(canonical_keys(job));
                build_job(index, merged)
            })
            .collect()
    }
}

/// Rename the legacy key spellings so a job overrides a default written either way
fn canonical_keys(object: JsonObject) -> JsonObject {
    object
        .into_iter()
        .map(|(key, value)| {
            let key = match key.as_str() {
                "SITE_URL" => "site_url".to_string(),
                "LIST_TITLE" => "list_title".to_string(),
                "COLUMNS" => "columns".to_string(),
                "CreateCSV" | "EXPORT_CSV" => "export_csv".to_string(),
                _ => key,
            };
            (key, value)
        })
        .collect()
}

fn build_job(index: usize, merged: JsonObject) -> Result<Job> {
    let entry: JobEntry = serde_json::from_value(JsonValue::Object(merged)).map_err(|e| {
        Error::config(format!("Job #{}: {e}", index + 1))
    })?;

    let site_url = entry
        .site_url
        .none_if_empty()
        .ok_or_else(|| Error::missing_field(format!("jobs[{index}].site_url")))?;
    let list_title = entry
        .list_title
        .none_if_empty()
        .ok_or_else(|| Error::missing_field(format!("jobs[{index}].list_title")))?;

    let columns = match entry.columns {
        Some(ColumnsValue::List(names)) => parse_column_list(&names),
        Some(ColumnsValue::Csv(s)) => parse_column_list(&[s]),
        None => None,
    };

    let export = entry.export_csv.then(|| CsvExportOptions {
        output_dir: entry.output_dir.unwrap_or_else(|| PathBuf::from(".")),
        timestamp: entry.timestamp,
        overwrite: entry.overwrite,
    });

    Ok(Job {
        site_url,
        list_title,
        columns,
        export,
    })
}

//! Integration tests using mock Graph and identity endpoints
//!
//! Tests the full end-to-end flow: credential file → token → paged column
//! requests → result table → CSV / batch outcomes

use graph_columns::auth::TokenProviderConfig;
use graph_columns::config::{Credentials, JobFile, DEFAULT_SECTION};
use graph_columns::engine::{ColumnsPipeline, Job, JobStatus};
use graph_columns::http::{GraphClient, GraphClientConfig};
use graph_columns::output::CsvExportOptions;
use graph_columns::types::BackoffType;
use graph_columns::{ColumnType, Error};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "https://contoso.sharepoint.com/sites/TeamA";
const COLUMNS_PATH: &str = r"^/v1.0/sites/contoso\.sharepoint\.com:/sites/TeamA:/lists/My%20Custom%20List/columns$";

fn write_credentials(dir: &Path, body: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(body).unwrap()).unwrap();
    path
}

fn full_credentials() -> serde_json::Value {
    json!({
        "azuread": {
            "tenant_id": "contoso-tenant",
            "client_id": "11111111-2222-3333-4444-555555555555",
            "client_secret": "s3cret"
        }
    })
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/contoso-tenant/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "graph-token"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Two pages: Status + DueDate, then Notes
async fn mount_team_a_pages(server: &MockServer) {
    let next = format!("{}/v1.0/next-page?$skiptoken=page2", server.uri());

    Mock::given(method("GET"))
        .and(path_regex(COLUMNS_PATH))
        .and(query_param("$top", "2"))
        .and(header("authorization", "Bearer graph-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {
                    "name": "Status",
                    "displayName": "Status",
                    "required": false,
                    "hidden": false,
                    "choice": {"choices": ["Open", "In Progress", "Closed"]}
                },
                {
                    "name": "DueDate",
                    "displayName": "Due Date",
                    "dateTime": {"displayAs": "default", "format": "dateOnly"}
                }
            ],
            "@odata.nextLink": next
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/next-page"))
        .and(query_param("$skiptoken", "page2"))
        .and(header("authorization", "Bearer graph-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"name": "Notes", "displayName": "Notes", "text": {"maxLength": 255}}
            ]
        })))
        .mount(server)
        .await;
}

fn pipeline(server: &MockServer, credentials: Credentials) -> ColumnsPipeline {
    let config = GraphClientConfig::builder()
        .base_url(format!("{}/v1.0", server.uri()))
        .max_retries(3)
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(10),
            Duration::from_millis(100),
        )
        .jitter(Duration::ZERO)
        .build();
    let client = GraphClient::with_auth(
        config,
        credentials,
        TokenProviderConfig::default().authority(server.uri()),
    )
    .unwrap();
    ColumnsPipeline::new(client).with_page_size(2)
}

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_team_a_end_to_end() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_team_a_pages(&server).await;

    let dir = tempdir().unwrap();
    let config_path = write_credentials(dir.path(), &full_credentials());
    let credentials = Credentials::from_json_file(&config_path, DEFAULT_SECTION).unwrap();

    let job = Job::new(SITE, "My Custom List").with_export(CsvExportOptions {
        output_dir: dir.path().join("exports"),
        timestamp: false,
        overwrite: false,
    });
    let report = pipeline(&server, credentials).run(&job).await.unwrap();

    assert_eq!(report.status, JobStatus::Succeeded);
    let rows = report.table.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().map(|r| r.column_type).collect::<Vec<_>>(),
        vec![ColumnType::Choice, ColumnType::DateTime, ColumnType::Text]
    );
    for option in ["Open", "In Progress", "Closed"] {
        assert!(rows[0].details.contains(option));
    }
    assert!(rows
        .iter()
        .all(|r| !r.required && !r.read_only && !r.hidden && !r.indexed && !r.enforce_unique));

    let csv_path = report.csv_path.unwrap();
    assert_eq!(
        csv_path,
        dir.path().join("exports").join("TeamA_My_Custom_List.csv")
    );
    let text = fs::read_to_string(&csv_path).unwrap();
    let text = text.trim_start_matches('\u{feff}');
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().nth(3).unwrap().starts_with("Notes,Notes,text,"));
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_team_a_pages(&server).await;

    let credentials = Credentials::new("contoso-tenant", "client", "s3cret").unwrap();
    let pipeline = pipeline(&server, credentials);
    let job = Job::new(SITE, "My Custom List");

    let first = pipeline.run(&job).await.unwrap();
    let second = pipeline.run(&job).await.unwrap();

    assert_eq!(first.table, second.table);
}

#[tokio::test]
async fn test_missing_client_secret_fails_before_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config_path = write_credentials(
        dir.path(),
        &json!({"azuread": {"tenant_id": "contoso-tenant", "client_id": "client"}}),
    );

    let err = Credentials::from_json_file(&config_path, DEFAULT_SECTION).unwrap_err();
    assert!(err.is_config());
    assert!(matches!(err, Error::MissingConfigField { ref field } if field.contains("client_secret")));
}

#[tokio::test]
async fn test_throttled_page_is_retried_after_hint() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path_regex(COLUMNS_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(COLUMNS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"name": "Title", "text": {}}]
        })))
        .mount(&server)
        .await;

    let credentials = Credentials::new("contoso-tenant", "client", "s3cret").unwrap();
    let started = Instant::now();
    let report = pipeline(&server, credentials)
        .run(&Job::new(SITE, "My Custom List"))
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(report.table.len(), 1);
}

#[tokio::test]
async fn test_rejected_credentials_surface_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let credentials = Credentials::new("contoso-tenant", "client", "wrong").unwrap();
    let err = pipeline(&server, credentials)
        .run(&Job::new(SITE, "My Custom List"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication { status: 401, .. }));
}

// ============================================================================
// Batch
// ============================================================================

#[tokio::test]
async fn test_batch_from_job_file() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_team_a_pages(&server).await;
    Mock::given(method("GET"))
        .and(path_regex(r"/lists/Archive/columns$"))
        .respond_with(ResponseTemplate::new(404).set_body_string("itemNotFound"))
        .expect(1)
        .mount(&server)
        .await;

    let job_file = JobFile::from_json_str(&format!(
        r#"{{
            "defaults": {{"site_url": "{SITE}", "columns": "Status, Owner"}},
            "jobs": [
                {{"list_title": "Archive"}},
                {{"list_title": "My Custom List"}},
                {{"list_title": "My Custom List", "columns": "*"}}
            ]
        }}"#
    ))
    .unwrap();
    let jobs = job_file.into_jobs().unwrap();

    let credentials = Credentials::new("contoso-tenant", "client", "s3cret").unwrap();
    let outcomes = pipeline(&server, credentials).run_batch(&jobs).await;

    let statuses: Vec<JobStatus> = outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![JobStatus::Failed, JobStatus::Partially, JobStatus::Succeeded]
    );
    assert_eq!(
        outcomes[1].report.as_ref().unwrap().missing,
        vec!["Owner".to_string()]
    );
    assert_eq!(outcomes[2].report.as_ref().unwrap().table.len(), 3);
}

//! Token provider implementation
//!
//! Exchanges app credentials for an access token and keeps it cached until
//! it is within the refresh margin of its expiry.

use super::types::AccessToken;
use crate::config::Credentials;
use crate::error::{Error, Result};
use chrono::Duration;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Microsoft identity platform host
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requesting every application permission granted to the app
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Lifetime assumed when the token response omits `expires_in`
const FALLBACK_LIFETIME_SECS: i64 = 3600;

/// Configuration for the token provider
#[derive(Debug, Clone)]
pub struct TokenProviderConfig {
    /// Identity platform base URL (tenant is appended)
    pub authority: String,
    /// Requested scope
    pub scope: String,
    /// Tokens this close to expiry are refreshed
    pub refresh_margin: Duration,
}

impl Default for TokenProviderConfig {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            scope: GRAPH_DEFAULT_SCOPE.to_string(),
            refresh_margin: Duration::seconds(300),
        }
    }
}

impl TokenProviderConfig {
    /// Use a different authority host
    #[must_use]
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Use a different refresh margin
    #[must_use]
    pub fn refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }
}

/// Client-credentials token provider with an in-memory cache
pub struct TokenProvider {
    credentials: Credentials,
    config: TokenProviderConfig,
    cached_token: Mutex<Option<AccessToken>>,
    http_client: Client,
}

impl TokenProvider {
    /// Create a provider with default settings
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, TokenProviderConfig::default())
    }

    /// Create a provider with custom settings
    pub fn with_config(credentials: Credentials, config: TokenProviderConfig) -> Self {
        Self::with_client(credentials, config, Client::new())
    }

    /// Create a provider that shares an existing HTTP client
    pub fn with_client(
        credentials: Credentials,
        config: TokenProviderConfig,
        http_client: Client,
    ) -> Self {
        Self {
            credentials,
            config,
            cached_token: Mutex::new(None),
            http_client,
        }
    }

    /// Token endpoint for the configured tenant
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority.trim_end_matches('/'),
            self.credentials.tenant_id
        )
    }

    /// Return the cached token, or fetch a new one when missing or near expiry
    pub async fn get_token(&self) -> Result<AccessToken> {
        let mut cached = self.cached_token.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired(self.config.refresh_margin) {
                return Ok(token.clone());
            }
            debug!("Cached access token is near expiry, refreshing");
        }

        let token = self.fetch_new_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token so the next call fetches a fresh one
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.lock().await;
        *cached = None;
    }

    /// The credentials this provider authenticates with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn fetch_new_token(&self) -> Result<AccessToken> {
        let creds = &self.credentials;
        for (field, value) in [
            ("tenant_id", &creds.tenant_id),
            ("client_id", &creds.client_id),
            ("client_secret", &creds.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("scope", self.config.scope.as_str()),
        ];

        let url = self.token_url();
        debug!("Requesting access token from {}", url);

        let response = self
            .http_client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::authentication(
                status.as_u16(),
                describe_token_error(&body),
            ));
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        let token = token_response.into_access_token();
        info!(
            "Acquired access token for tenant {} (expires {})",
            creds.tenant_id, token.expires_at
        );
        Ok(token)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<Value>,
}

impl TokenResponse {
    fn into_access_token(self) -> AccessToken {
        // v1 endpoints send expires_in as a string
        let seconds = match &self.expires_in {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        AccessToken::expires_in(self.access_token, seconds.unwrap_or(FALLBACK_LIFETIME_SECS))
    }
}

/// Error payload of the identity platform
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// `error: description` from an identity platform error body, raw body otherwise
fn describe_token_error(body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error: Some(error),
            error_description,
        }) => match error_description {
            Some(desc) => format!("{error}: {}", desc.trim()),
            None => error,
        },
        _ => body.trim().to_string(),
    }
}

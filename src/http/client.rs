//! Graph HTTP client with retry and paging
//!
//! Handles:
//! - Bearer authentication through the token provider
//! - Retries on 429/5xx, waiting `Retry-After` or a jittered backoff
//! - Immediate failure on every other non-2xx
//! - Following `@odata.nextLink` across pages

use super::paging::Page;
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{TokenProvider, TokenProviderConfig};
use crate::config::Credentials;
use crate::error::{is_retryable_status, Error, Result};
use crate::types::BackoffType;
use rand::Rng;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Response};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Microsoft Graph v1.0 endpoint
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Configuration for the Graph client
#[derive(Debug, Clone)]
pub struct GraphClientConfig {
    /// Base URL that relative paths are joined onto
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Upper bound of the random delay added to each backoff
    pub jitter: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for GraphClientConfig {
    fn default() -> Self {
        Self {
            base_url: GRAPH_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            jitter: Duration::from_millis(250),
            rate_limit: None,
            user_agent: format!("graph-columns/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GraphClientConfig {
    /// Create a new config builder
    pub fn builder() -> GraphClientConfigBuilder {
        GraphClientConfigBuilder::default()
    }
}

/// Builder for Graph client config
#[derive(Default)]
pub struct GraphClientConfigBuilder {
    config: GraphClientConfig,
}

impl GraphClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set the jitter bound (zero disables jitter)
    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.config.jitter = jitter;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> GraphClientConfig {
        self.config
    }
}

/// Microsoft Graph client with retry and paging
pub struct GraphClient {
    client: Client,
    config: GraphClientConfig,
    token_provider: Option<TokenProvider>,
    rate_limiter: Option<RateLimiter>,
}

impl GraphClient {
    /// Create an unauthenticated client
    pub fn with_config(config: GraphClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            token_provider: None,
            rate_limiter,
        })
    }

    /// Create a client that authenticates with the given credentials
    pub fn with_auth(
        config: GraphClientConfig,
        credentials: Credentials,
        token_config: TokenProviderConfig,
    ) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.token_provider = Some(TokenProvider::with_client(
            credentials,
            token_config,
            client.client.clone(),
        ));
        Ok(client)
    }

    /// The token provider, when authenticated
    pub fn token_provider(&self) -> Option<&TokenProvider> {
        self.token_provider.as_ref()
    }

    /// Client configuration
    pub fn config(&self) -> &GraphClientConfig {
        &self.config
    }

    /// GET a URL and parse the JSON body, retrying transient failures
    #[allow(clippy::too_many_lines)]
    pub async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
        let full_url = self.build_url(url);
        let max_retries = self.config.max_retries;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self
                .client
                .get(&full_url)
                .header(ACCEPT, "application/json");

            if !query.is_empty() {
                req = req.query(query);
            }

            if let Some(ref provider) = self.token_provider {
                let token = provider.get_token().await?;
                req = req.header(AUTHORIZATION, token.bearer());
            }

            let response = match req.send().await {
                Ok(response) => response,
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt <= max_retries {
                        let delay = self.retry_delay(attempt, None);
                        warn!(
                            "Transport error ({}), attempt {}/{}, retrying in {:?}",
                            e,
                            attempt,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(Error::Http(e));
                }
            };

            let status = response.status();
            if status.is_success() {
                debug!("GET {} -> {}", full_url, status.as_u16());
                return response.json::<Value>().await.map_err(Error::Http);
            }

            let code = status.as_u16();
            if is_retryable_status(code) {
                if attempt <= max_retries {
                    let delay = self.retry_delay(attempt, extract_retry_after(&response));
                    warn!(
                        "Request failed with {}, attempt {}/{}, retrying in {:?}",
                        code,
                        attempt,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }

                let body = response.text().await.unwrap_or_default();
                return Err(Error::TransientFailure {
                    status: code,
                    body,
                    attempts: attempt,
                });
            }

            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(code, body));
        }
    }

    /// Fetch every item of a collection, following `@odata.nextLink`
    ///
    /// The first request carries `$top=<page_size>`; continuation links are
    /// requested exactly as returned. Items keep page order, then in-page order.
    pub async fn fetch_all_pages(&self, url: &str, page_size: Option<u32>) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut query: Vec<(String, String)> = page_size
            .map(|n| vec![("$top".to_string(), n.to_string())])
            .unwrap_or_default();
        let mut current = url.to_string();
        let mut visited = HashSet::new();
        let mut pages = 0usize;

        loop {
            visited.insert(self.build_url(&current));
            let page = Page::from_json(self.get_json(&current, &query).await?);
            pages += 1;
            debug!("Page {} returned {} items", pages, page.items.len());
            items.extend(page.items);

            match page.next_link {
                Some(next) if visited.contains(&self.build_url(&next)) => {
                    return Err(Error::Other(format!(
                        "Pagination loop: next link repeats {next}"
                    )));
                }
                Some(next) => {
                    current = next;
                    query.clear();
                }
                None => break,
            }
        }

        debug!("Fetched {} items over {} pages", items.len(), pages);
        Ok(items)
    }

    /// Build full URL from a path or absolute URL
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Delay before the next attempt: the server hint if given, else backoff plus jitter
    fn retry_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint,
            None => self.calculate_backoff(attempt.saturating_sub(1)) + self.random_jitter(),
        }
    }

    /// Calculate backoff delay for a zero-based retry index
    pub fn calculate_backoff(&self, retry: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff.saturating_mul(retry + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(retry);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }

    fn random_jitter(&self) -> Duration {
        let max_ms = u64::try_from(self.config.jitter.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("config", &self.config)
            .field("has_token_provider", &self.token_provider.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// `Retry-After` in (possibly fractional) seconds
fn extract_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}

pub(crate) fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs.max(0.0)).ok()
}

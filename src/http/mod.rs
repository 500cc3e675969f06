//! HTTP client module
//!
//! Graph client with retry, paging, and optional client-side rate limiting.
//!
//! # Features
//!
//! - **Automatic Retries**: 429/5xx are retried, honoring `Retry-After`
//! - **Backoff**: exponential (or constant/linear) with random jitter
//! - **Paging**: follows `@odata.nextLink` until exhausted
//! - **Authentication**: bearer tokens from the auth module
//! - **Rate Limiting**: optional token bucket using governor

mod client;
mod paging;
mod rate_limit;

pub use client::{GraphClient, GraphClientConfig, GraphClientConfigBuilder, GRAPH_BASE_URL};
pub use paging::{Page, NEXT_LINK_KEY};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

//! Authentication module
//!
//! Application-only access tokens for Microsoft Graph via the OAuth2
//! client-credentials flow.
//!
//! The `TokenProvider` owns the cached token and refreshes it when it gets
//! close to expiry. There is no process-wide cache; callers hold the provider.

mod provider;
mod types;

pub use provider::{TokenProvider, TokenProviderConfig, DEFAULT_AUTHORITY, GRAPH_DEFAULT_SCOPE};
pub use types::AccessToken;

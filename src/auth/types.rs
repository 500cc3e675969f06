//! Token types

use chrono::{DateTime, Duration, Utc};

/// Longest token lifetime accepted from the identity platform
pub const MAX_LIFETIME_SECS: i64 = 86_400;

/// Bearer token with its absolute expiry
#[derive(Clone)]
pub struct AccessToken {
    /// The bearer value
    pub token: String,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a new token
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Create a token that expires in N seconds from now
    ///
    /// Lifetimes are clamped to one day either way.
    pub fn expires_in(token: impl Into<String>, seconds: i64) -> Self {
        let seconds = seconds.clamp(-MAX_LIFETIME_SECS, MAX_LIFETIME_SECS);
        let now = Utc::now();
        let expires_at = Duration::try_seconds(seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(now);
        Self::new(token, expires_at)
    }

    /// True once `now + margin` reaches the expiry
    pub fn is_expired(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

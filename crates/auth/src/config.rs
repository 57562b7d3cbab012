//! Auth core configuration.

use std::time::Duration;

use chrono::Duration as TokenTtl;

/// Default bcrypt work factor (the cost the production deployment runs at).
pub const DEFAULT_HASH_COST: u32 = 10;

/// Configuration for the auth core.
///
/// The signing secret is process-wide and read-only after startup; the core
/// holds no other shared mutable state.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret the session tokens are signed with.
    pub token_secret: String,
    /// Validity window: `expires_at = issued_at + token_ttl`.
    pub token_ttl: TokenTtl,
    /// bcrypt cost factor. Lowered in tests, never in production.
    pub hash_cost: u32,
    /// Upper bound on the verifier's live directory lookup. On elapse the
    /// request fails closed.
    pub directory_timeout: Duration,
}

impl AuthConfig {
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_ttl: TokenTtl::hours(1),
            hash_cost: DEFAULT_HASH_COST,
            directory_timeout: Duration::from_secs(5),
        }
    }

    /// Read configuration from the environment.
    ///
    /// `GATEHOUSE_TOKEN_SECRET` is the one value a deployment must provide;
    /// a missing secret falls back to an insecure dev default with a warning.
    pub fn from_env() -> Self {
        let token_secret = std::env::var("GATEHOUSE_TOKEN_SECRET").unwrap_or_else(|_| {
            tracing::warn!("GATEHOUSE_TOKEN_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let mut config = Self::new(token_secret);

        if let Ok(raw) = std::env::var("GATEHOUSE_TOKEN_TTL_SECS") {
            match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => config.token_ttl = TokenTtl::seconds(secs),
                _ => tracing::warn!("ignoring invalid GATEHOUSE_TOKEN_TTL_SECS"),
            }
        }

        if let Ok(raw) = std::env::var("GATEHOUSE_HASH_COST") {
            match raw.parse::<u32>() {
                Ok(cost) => config.hash_cost = cost,
                Err(_) => tracing::warn!("ignoring invalid GATEHOUSE_HASH_COST"),
            }
        }

        if let Ok(raw) = std::env::var("GATEHOUSE_DIRECTORY_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => config.directory_timeout = Duration::from_millis(ms),
                Err(_) => tracing::warn!("ignoring invalid GATEHOUSE_DIRECTORY_TIMEOUT_MS"),
            }
        }

        config
    }

    pub fn with_token_ttl(mut self, ttl: TokenTtl) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn with_directory_timeout(mut self, timeout: Duration) -> Self {
        self.directory_timeout = timeout;
        self
    }
}

// Manual Debug: the signing secret must not leak through log formatting.
impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .field("directory_timeout", &self.directory_timeout)
            .finish()
    }
}

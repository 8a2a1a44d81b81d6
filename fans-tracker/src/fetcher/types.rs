use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Public API host serving relation statistics.
pub const DEFAULT_ENDPOINT: &str = "https://api.bilibili.com";

/// Path of the relation statistics endpoint, relative to the endpoint host.
pub const STAT_PATH: &str = "/x/relation/stat";

/// Browser identification sent with every request. The upstream service
/// rejects requests that look like bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the statistics HTTP client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    endpoint: String,
    user_agent: String,
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FetcherConfig {
    /// Create a configuration pointing at the public API.
    ///
    /// Certificate validation is disabled by default to match the upstream
    /// integration this client replaces; use
    /// [`with_accept_invalid_certs`](Self::with_accept_invalid_certs) to turn
    /// it back on.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: true,
        }
    }

    /// Set a custom API endpoint (scheme and host, no trailing path).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Control whether invalid TLS certificates are accepted.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Get the API endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether invalid TLS certificates are accepted.
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Full URL of the statistics endpoint.
    pub fn stat_url(&self) -> String {
        format!("{}{}", self.endpoint, STAT_PATH)
    }
}

/// Relation statistics for one account, as returned by a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// Canonical numeric user id reported by the endpoint.
    pub mid: u64,
    pub follower: u64,
    pub following: u64,
}

/// JSON envelope wrapping every API response.
#[derive(Debug, Deserialize)]
pub(crate) struct StatEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<FetchResult>,
}

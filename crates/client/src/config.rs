//! Client configuration.

use std::env;
use std::time::Duration;

/// Backend used when `SNAPPY_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Point the client at `base_url`. A trailing slash is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `SNAPPY_API_URL`, falling back to the local development server.
    pub fn from_env() -> Self {
        let base_url = env::var("SNAPPY_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

//! Client configuration.
//!
//! [`CensusConfig`] carries everything about where and how requests are sent.
//! Its `Default` honours `CENSUS_BASE_URL` so tests and alternate deployments
//! can point the client elsewhere without code changes.

use serde::{Deserialize, Serialize};

/// Default Census API base URL (without the version segment).
pub const DEFAULT_BASE_URL: &str = "https://app.getcensus.com/api";

/// Default Census API version.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "CENSUS_BASE_URL";

/// Core client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusConfig {
    /// Base URL of the API, e.g. `https://app.getcensus.com/api`
    pub base_url: String,
    /// Version segment appended to the base URL
    pub api_version: String,
    /// Timeout for a single request in seconds
    pub timeout_secs: u64,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for CensusConfig {
    fn default() -> Self {
        let base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        CensusConfig {
            base_url,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("census-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CensusConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

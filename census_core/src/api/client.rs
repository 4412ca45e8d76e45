//! Main Census API client.
//!
//! The `CensusClient` is the primary entry point for interacting with the Census API.

use crate::auth::CensusCredentials;
use crate::config::CensusConfig;
use crate::http::HttpClient;
use crate::polling::PollConfig;
use crate::urls;
use crate::CensusError;

use super::syncs::SyncsClient;
use super::types::{SyncRunResponse, TriggerOptions, TriggerOutcome};

/// Census API client.
///
/// Holds the credentials, the configuration, and an HTTP transport built from
/// them. Nothing about it changes after construction.
///
/// # Example
///
/// ```ignore
/// use census_core::{CensusClient, CensusCredentials};
///
/// let client = CensusClient::new(CensusCredentials::new("secret-token"))?;
/// let run = client.get_sync_run(1234567890).await?;
/// println!("status: {}", run.data.status);
/// ```
pub struct CensusClient {
    pub(crate) http: HttpClient,
    credentials: CensusCredentials,
    config: CensusConfig,
}

impl CensusClient {
    /// Create a new client with the default configuration.
    pub fn new(credentials: CensusCredentials) -> Result<Self, CensusError> {
        Self::with_config(credentials, CensusConfig::default())
    }

    /// Create a new client with an explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Census access token
    /// * `config` - Base URL, API version, timeout, User-Agent
    pub fn with_config(
        credentials: CensusCredentials,
        config: CensusConfig,
    ) -> Result<Self, CensusError> {
        let api_base = urls::versioned_api_base(&config.base_url, &config.api_version)?;
        let http = HttpClient::new(api_base, &credentials, &config)?;

        Ok(Self {
            http,
            credentials,
            config,
        })
    }

    /// Create a client from environment variables.
    ///
    /// Reads the token from `CENSUS_ACCESS_TOKEN` (or `CENSUS_API_KEY`) and the
    /// base URL from `CENSUS_BASE_URL` when set.
    pub fn from_env() -> Result<Self, CensusError> {
        let credentials = CensusCredentials::from_env().ok_or_else(|| {
            CensusError::config("CENSUS_ACCESS_TOKEN environment variable not set")
        })?;
        Self::new(credentials)
    }

    /// Get the credentials this client authenticates with.
    pub fn credentials(&self) -> &CensusCredentials {
        &self.credentials
    }

    /// Get the configuration this client was built from.
    pub fn config(&self) -> &CensusConfig {
        &self.config
    }

    /// Versioned API root requests are sent to.
    pub fn api_base(&self) -> &str {
        self.http.base_url()
    }

    /// Get a Syncs API client.
    pub fn syncs(&self) -> SyncsClient<'_> {
        SyncsClient::new(self)
    }

    /// Get a sync run by ID. See [`SyncsClient::get_sync_run`].
    pub async fn get_sync_run(&self, sync_run_id: i64) -> Result<SyncRunResponse, CensusError> {
        self.syncs().get_sync_run(sync_run_id).await
    }

    /// Trigger a sync. See [`SyncsClient::trigger`].
    pub async fn trigger_sync_run(
        &self,
        sync_id: i64,
        options: &TriggerOptions,
    ) -> Result<TriggerOutcome, CensusError> {
        self.syncs().trigger(sync_id, options).await
    }

    /// Wait for a sync run to finish. See [`SyncsClient::wait_for_sync_run`].
    pub async fn wait_for_sync_run(
        &self,
        sync_run_id: i64,
        config: &PollConfig,
    ) -> Result<SyncRunResponse, CensusError> {
        self.syncs().wait_for_sync_run(sync_run_id, config).await
    }
}

impl std::fmt::Debug for CensusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CensusClient")
            .field("api_base", &self.http.base_url())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

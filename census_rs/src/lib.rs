//! # Census SDK
//!
//! Ergonomic Rust SDK for triggering and monitoring Census syncs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use census::Census;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), census::Error> {
//!     // Create client from CENSUS_ACCESS_TOKEN env var
//!     let census = Census::from_env()?;
//!
//!     // Trigger a full sync and wait for the run to finish
//!     let outcome = census
//!         .trigger(1234)
//!         .force_full_sync(true)
//!         .wait_for_completion()
//!         .run()
//!         .await?;
//!
//!     println!("Sync run: {:?}", outcome.sync_run_id());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use thiserror::Error;

pub mod trigger;

pub use trigger::TriggerBuilder;

// Re-export core for advanced usage
pub use census_core as core;

// Re-export commonly used core types
pub use census_core::{
    ApiResponse, BackoffConfig, CensusClient, CensusConfig, CensusCredentials, CensusError,
    PollConfig, SyncRun, SyncRunResponse, SyncRunStatus, SyncTrigger, SyncTriggerResponse,
    TriggerOptions, TriggerOutcome, DEFAULT_POLL_INTERVAL_SECS,
};

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Census API base URL.
pub const DEFAULT_BASE_URL: &str = census_core::config::DEFAULT_BASE_URL;

/// Environment variable for the access token.
pub const ACCESS_TOKEN_ENV: &str = census_core::auth::ENV_ACCESS_TOKEN;

// =============================================================================
// Error Types
// =============================================================================

/// SDK error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing access token.
    #[error("access token not found. Set {ACCESS_TOKEN_ENV} or provide explicitly.")]
    MissingAccessToken,

    /// Core error passthrough.
    #[error(transparent)]
    Core(#[from] CensusError),
}

impl Error {
    /// The core error, if this came from an API call.
    pub fn as_core(&self) -> Option<&CensusError> {
        match self {
            Error::Core(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Main Client
// =============================================================================

/// Main Census client.
///
/// # Example
///
/// ```rust,ignore
/// use census::Census;
///
/// let census = Census::from_env()?;
///
/// // Or with explicit credentials
/// let census = Census::new("secret-token", None)?;
/// ```
pub struct Census {
    client: CensusClient,
}

impl Census {
    /// Create a new Census client with an explicit token.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Your Census access token
    /// * `base_url` - Optional custom API base URL
    pub fn new(access_token: impl Into<String>, base_url: Option<&str>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(Error::MissingAccessToken);
        }

        let mut config = CensusConfig::default();
        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url);
        }
        Self::with_config(CensusCredentials::new(access_token), config)
    }

    /// Create a Census client from credentials and a full configuration.
    pub fn with_config(credentials: CensusCredentials, config: CensusConfig) -> Result<Self> {
        let client = CensusClient::with_config(credentials, config).map_err(Error::Core)?;
        Ok(Self { client })
    }

    /// Create a client from the `CENSUS_ACCESS_TOKEN` environment variable.
    ///
    /// `CENSUS_BASE_URL` overrides the API location when set.
    pub fn from_env() -> Result<Self> {
        let credentials = CensusCredentials::from_env().ok_or(Error::MissingAccessToken)?;
        Self::with_config(credentials, CensusConfig::default())
    }

    /// Get the access token (masked for display).
    pub fn access_token_masked(&self) -> String {
        census_core::auth::mask_str(self.client.credentials().access_token().expose_secret())
    }

    /// Versioned API root requests are sent to.
    pub fn api_base(&self) -> &str {
        self.client.api_base()
    }

    /// Access the underlying core client.
    pub fn core(&self) -> &CensusClient {
        &self.client
    }

    // -------------------------------------------------------------------------
    // High-level API
    // -------------------------------------------------------------------------

    /// Start triggering a sync.
    ///
    /// Returns a builder to configure the trigger.
    pub fn trigger(&self, sync_id: i64) -> TriggerBuilder<'_> {
        TriggerBuilder::new(&self.client, sync_id)
    }

    /// Get a sync run by ID.
    pub async fn sync_run(&self, sync_run_id: i64) -> Result<SyncRunResponse> {
        self.client
            .get_sync_run(sync_run_id)
            .await
            .map_err(Error::Core)
    }

    /// Wait for an existing sync run to complete.
    pub async fn wait_for_sync_run(
        &self,
        sync_run_id: i64,
        poll: &PollConfig,
    ) -> Result<SyncRunResponse> {
        self.client
            .wait_for_sync_run(sync_run_id, poll)
            .await
            .map_err(Error::Core)
    }
}

impl std::fmt::Debug for Census {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Census")
            .field("access_token", &self.access_token_masked())
            .field("api_base", &self.api_base())
            .finish()
    }
}

// =============================================================================
// Task Entry Point
// =============================================================================

/// Trigger a sync and, optionally, wait for it to complete.
///
/// One call with the same shape as an orchestrator task, so a workflow
/// wrapper can bind to it directly. Uses [`CensusConfig::default`]; see
/// [`trigger_sync_run_with_config`] to point at another API location.
///
/// # Arguments
///
/// * `credentials` - Census credentials
/// * `sync_id` - The sync to trigger
/// * `force_full_sync` - Whether to run the sync in full refresh mode
/// * `wait_for_sync_run_completed` - Whether to wait for the sync run to finish
/// * `poll_status_every` - Delay between status polls while waiting
pub async fn trigger_sync_run(
    credentials: &CensusCredentials,
    sync_id: i64,
    force_full_sync: bool,
    wait_for_sync_run_completed: bool,
    poll_status_every: Duration,
) -> Result<TriggerOutcome> {
    trigger_sync_run_with_config(
        credentials,
        CensusConfig::default(),
        sync_id,
        force_full_sync,
        wait_for_sync_run_completed,
        poll_status_every,
    )
    .await
}

/// [`trigger_sync_run`] against an explicit configuration.
pub async fn trigger_sync_run_with_config(
    credentials: &CensusCredentials,
    config: CensusConfig,
    sync_id: i64,
    force_full_sync: bool,
    wait_for_sync_run_completed: bool,
    poll_status_every: Duration,
) -> Result<TriggerOutcome> {
    let census = Census::with_config(credentials.clone(), config)?;
    census
        .trigger(sync_id)
        .force_full_sync(force_full_sync)
        .wait(wait_for_sync_run_completed)
        .poll_every(poll_status_every)
        .run()
        .await
}

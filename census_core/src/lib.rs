//! Census core library.
//!
//! This crate provides the core functionality for the Census SDK:
//! - API client for triggering syncs and fetching sync runs
//! - Credential handling
//! - Configuration
//! - HTTP transport with Census Basic auth
//! - Polling policy for waiting on sync runs

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod polling;
pub mod urls;

// Re-export core types at crate root for convenience
pub use auth::CensusCredentials;
pub use config::CensusConfig;
pub use errors::{CensusError, CensusResult, HttpErrorInfo, SyncRunFailure};
pub use polling::{BackoffConfig, PollConfig, DEFAULT_POLL_INTERVAL_SECS};

// Re-export API types for convenience
pub use api::{
    ApiResponse, CensusClient, SyncRun, SyncRunResponse, SyncRunStatus, SyncTrigger,
    SyncTriggerResponse, SyncsClient, TriggerOptions, TriggerOutcome,
};

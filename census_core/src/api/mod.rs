//! Census API client.
//!
//! This module provides a client for the Census sync endpoints.
//!
//! # Example
//!
//! ```ignore
//! use census_core::api::{CensusClient, TriggerOptions};
//! use census_core::CensusCredentials;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CensusClient::new(CensusCredentials::new("secret-token"))?;
//!
//!     // Trigger a sync and wait for its run to finish
//!     let options = TriggerOptions::default().wait_for_sync_run_completed(true);
//!     let outcome = client.trigger_sync_run(1234, &options).await?;
//!     println!("sync run: {:?}", outcome.sync_run_id());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod syncs;
pub mod types;

pub use client::CensusClient;
pub use syncs::SyncsClient;
pub use types::{
    parse_envelope, ApiResponse, SyncRun, SyncRunResponse, SyncRunStatus, SyncTrigger,
    SyncTriggerResponse, TriggerOptions, TriggerOutcome,
};

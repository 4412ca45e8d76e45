//! Shared helpers for Census client integration tests

#![allow(dead_code)]

use std::time::Duration;

use census_core::{CensusClient, CensusConfig, CensusCredentials, PollConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "foo";

/// `Basic base64("bearer:foo")`
pub const AUTH_HEADER: &str = "Basic YmVhcmVyOmZvbw==";

pub const SYNC_ID: i64 = 1234;
pub const SYNC_RUN_ID: i64 = 1234567890;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start a mock Census server
pub async fn start_server() -> MockServer {
    init_tracing();
    MockServer::start().await
}

/// Create a client pointed at the mock server
pub fn client_for(server: &MockServer) -> CensusClient {
    let config = CensusConfig::default()
        .with_base_url(format!("{}/api", server.uri()))
        .with_timeout_secs(5);
    CensusClient::with_config(CensusCredentials::new(TOKEN), config)
        .expect("Failed to create Census client")
}

pub fn sync_run_path(sync_run_id: i64) -> String {
    format!("/api/v1/sync_runs/{sync_run_id}")
}

pub fn trigger_path(sync_id: i64) -> String {
    format!("/api/v1/syncs/{sync_id}/trigger")
}

/// Poll policy fast enough for tests
pub fn fast_poll() -> PollConfig {
    PollConfig::every(Duration::from_millis(10))
}

pub fn success(data: Value) -> Value {
    json!({"status": "success", "data": data})
}

pub fn error(message: &str) -> Value {
    json!({"status": "error", "message": message})
}

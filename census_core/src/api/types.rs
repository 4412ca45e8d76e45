//! API request and response types.
//!
//! Every Census response is an envelope: `{"status": "success", "data": {...}}`
//! or `{"status": "error", "message": "..."}`. Payload fields the client does
//! not interpret are kept in `extra` maps so envelopes round-trip unchanged.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::polling::PollConfig;
use crate::CensusError;

// =============================================================================
// Sync Run Status
// =============================================================================

/// Status of a sync run.
///
/// Census owns this vocabulary. Values the client does not know are kept
/// verbatim in [`SyncRunStatus::Unknown`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SyncRunStatus {
    Queued,
    Working,
    Completed,
    Failed,
    Unknown(String),
}

impl SyncRunStatus {
    /// Check if this status is terminal (run won't change state).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Check if this status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Parse from string. Matching is exact; Census sends lowercase.
    pub fn parse(s: &str) -> Self {
        match s {
            "queued" => Self::Queued,
            "working" => Self::Working,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Working => "working",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown(s) => s.as_str(),
        }
    }
}

impl From<String> for SyncRunStatus {
    fn from(s: String) -> Self {
        SyncRunStatus::parse(&s)
    }
}

impl From<SyncRunStatus> for String {
    fn from(status: SyncRunStatus) -> Self {
        match status {
            SyncRunStatus::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// A successful Census response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `"success"` once validated.
    pub status: String,
    /// Endpoint payload.
    pub data: T,
    /// Any other top-level fields Census sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validate a response envelope and deserialize its payload.
///
/// Only `status == "success"` is accepted. An `error` envelope becomes
/// [`CensusError::Api`] carrying the server message; anything else is a
/// protocol error.
pub fn parse_envelope<T: DeserializeOwned>(payload: Value) -> Result<ApiResponse<T>, CensusError> {
    match payload.get("status").and_then(Value::as_str) {
        Some("success") => serde_json::from_value(payload)
            .map_err(|e| CensusError::protocol(format!("invalid response payload: {}", e))),
        Some("error") => {
            let message = match payload.get("message") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "unknown error".to_string(),
            };
            Err(CensusError::api(message))
        }
        Some(other) => Err(CensusError::protocol(format!(
            "unexpected response status: {}",
            other
        ))),
        None => Err(CensusError::protocol("response has no status field")),
    }
}

// =============================================================================
// Sync Runs
// =============================================================================

/// A sync run as returned by `GET /sync_runs/{id}`.
///
/// Only `status` is decoded. Every other field, `null`s included, stays in
/// `extra` exactly as Census sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRun {
    /// Current status.
    pub status: SyncRunStatus,
    /// Everything else (`id`, `error_message`, `records_processed`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SyncRun {
    /// Look up a field Census reported for this run.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Sync run ID.
    pub fn id(&self) -> Option<i64> {
        self.field("id").and_then(Value::as_i64)
    }

    /// Sync this run belongs to.
    pub fn sync_id(&self) -> Option<i64> {
        self.field("sync_id").and_then(Value::as_i64)
    }

    /// Error message, when Census sent a non-null one.
    pub fn error_message(&self) -> Option<&str> {
        self.field("error_message").and_then(Value::as_str)
    }
}

/// Payload of `POST /syncs/{id}/trigger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncTrigger {
    /// ID of the newly created sync run.
    pub sync_run_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type SyncRunResponse = ApiResponse<SyncRun>;
pub type SyncTriggerResponse = ApiResponse<SyncTrigger>;

// =============================================================================
// Trigger Request/Result
// =============================================================================

/// Options for triggering a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerOptions {
    /// Reprocess all records instead of an incremental delta.
    pub force_full_sync: bool,
    /// Poll the new sync run until it completes or fails.
    pub wait_for_sync_run_completed: bool,
    /// Polling policy used when waiting.
    pub poll: PollConfig,
}

impl TriggerOptions {
    pub fn force_full_sync(mut self, force_full_sync: bool) -> Self {
        self.force_full_sync = force_full_sync;
        self
    }

    pub fn wait_for_sync_run_completed(mut self, wait: bool) -> Self {
        self.wait_for_sync_run_completed = wait;
        self
    }

    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Query parameters for the trigger call.
    ///
    /// `force_full_sync` is only sent when true.
    pub(crate) fn query_params(&self) -> Option<Vec<(&'static str, &'static str)>> {
        if self.force_full_sync {
            Some(vec![("force_full_sync", "true")])
        } else {
            None
        }
    }
}

/// Result of a trigger call.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// The sync was triggered; the run has not been waited on.
    Triggered(SyncTriggerResponse),
    /// The run was waited on and completed.
    Completed(SyncRunResponse),
}

impl TriggerOutcome {
    /// The sync run created by the trigger, when known.
    pub fn sync_run_id(&self) -> Option<i64> {
        match self {
            TriggerOutcome::Triggered(resp) => Some(resp.data.sync_run_id),
            TriggerOutcome::Completed(resp) => resp.data.id(),
        }
    }

    /// Whether the run was waited on to completion.
    pub fn is_completed(&self) -> bool {
        matches!(self, TriggerOutcome::Completed(_))
    }

    /// The envelope as JSON, exactly as Census returned it.
    pub fn to_json(&self) -> Result<Value, CensusError> {
        let value = match self {
            TriggerOutcome::Triggered(resp) => serde_json::to_value(resp),
            TriggerOutcome::Completed(resp) => serde_json::to_value(resp),
        };
        value.map_err(|e| CensusError::protocol(format!("failed to serialize envelope: {}", e)))
    }
}

//! Syncs API client.
//!
//! This module triggers syncs, fetches sync runs, and waits for a sync run
//! to reach a terminal status.

use tracing::{debug, info, warn};

use crate::polling::{PollConfig, PollState};
use crate::urls;
use crate::CensusError;

use super::client::CensusClient;
use super::types::{
    parse_envelope, SyncRunResponse, SyncRunStatus, SyncTriggerResponse, TriggerOptions,
    TriggerOutcome,
};

/// Syncs API client.
///
/// Use this to trigger syncs and follow the sync runs they create.
pub struct SyncsClient<'a> {
    client: &'a CensusClient,
}

impl<'a> SyncsClient<'a> {
    /// Create a new Syncs client.
    pub(crate) fn new(client: &'a CensusClient) -> Self {
        Self { client }
    }

    /// Get a sync run by ID.
    ///
    /// A run that reports `failed` is returned as
    /// [`CensusError::SyncRunFailed`] carrying its `error_message`, even though
    /// the call itself succeeded.
    ///
    /// # Arguments
    ///
    /// * `sync_run_id` - The sync run to fetch
    ///
    /// # Returns
    ///
    /// The full response envelope, extra fields included.
    pub async fn get_sync_run(&self, sync_run_id: i64) -> Result<SyncRunResponse, CensusError> {
        let path = urls::sync_run_path(sync_run_id);
        let payload = self.client.http.get_json(&path, None).await?;
        let response: SyncRunResponse = parse_envelope(payload)?;

        if response.data.status.is_failed() {
            let message = response.data.error_message().unwrap_or("unknown error");
            return Err(CensusError::sync_run_failed(sync_run_id, message));
        }

        Ok(response)
    }

    /// Trigger a sync and optionally wait for the run it creates.
    ///
    /// # Arguments
    ///
    /// * `sync_id` - The sync to trigger
    /// * `options` - Full sync flag, whether to wait, and the polling policy
    ///
    /// # Returns
    ///
    /// [`TriggerOutcome::Triggered`] with the trigger envelope when not waiting,
    /// otherwise [`TriggerOutcome::Completed`] with the final sync run envelope.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let options = TriggerOptions::default()
    ///     .force_full_sync(true)
    ///     .wait_for_sync_run_completed(true);
    /// let outcome = client.syncs().trigger(1234, &options).await?;
    /// ```
    pub async fn trigger(
        &self,
        sync_id: i64,
        options: &TriggerOptions,
    ) -> Result<TriggerOutcome, CensusError> {
        if options.wait_for_sync_run_completed {
            options.poll.validate()?;
        }

        let path = urls::trigger_sync_path(sync_id);
        let params = options.query_params();
        let payload = self
            .client
            .http
            .post_json(&path, params.as_deref())
            .await?;
        let response: SyncTriggerResponse = parse_envelope(payload)?;

        let sync_run_id = response.data.sync_run_id;
        info!(
            sync_id,
            sync_run_id,
            force_full_sync = options.force_full_sync,
            "triggered Census sync"
        );

        if !options.wait_for_sync_run_completed {
            return Ok(TriggerOutcome::Triggered(response));
        }

        let completed = self.wait_for_sync_run(sync_run_id, &options.poll).await?;
        Ok(TriggerOutcome::Completed(completed))
    }

    /// Poll a sync run until it completes or fails.
    ///
    /// `working`, `queued` and unrecognized statuses all sleep for the policy's
    /// next delay before polling again. With the default policy the loop only
    /// ends when the run completes or fails. Sleeps never run past a configured
    /// deadline.
    ///
    /// A policy whose delay can be zero is rejected with
    /// [`CensusError::InvalidInput`] before the first poll.
    ///
    /// # Arguments
    ///
    /// * `sync_run_id` - The sync run to wait on
    /// * `config` - Polling policy
    pub async fn wait_for_sync_run(
        &self,
        sync_run_id: i64,
        config: &PollConfig,
    ) -> Result<SyncRunResponse, CensusError> {
        config.validate()?;
        let mut state = PollState::new(config.clone());

        loop {
            let response = self.get_sync_run(sync_run_id).await?;

            match &response.data.status {
                SyncRunStatus::Completed => {
                    info!(
                        sync_run_id,
                        polls = state.attempts + 1,
                        elapsed_ms = state.elapsed().as_millis() as u64,
                        "Census sync run completed"
                    );
                    return Ok(response);
                }
                SyncRunStatus::Failed => {
                    // get_sync_run already rejects failed runs
                    let message = response.data.error_message().unwrap_or("unknown error");
                    return Err(CensusError::sync_run_failed(sync_run_id, message));
                }
                SyncRunStatus::Working | SyncRunStatus::Queued => {
                    debug!(sync_run_id, status = %response.data.status, "Census sync run still in progress");
                }
                SyncRunStatus::Unknown(status) => {
                    warn!(sync_run_id, status = %status, "unrecognized Census sync run status, continuing to poll");
                }
            }

            state.record_attempt();
            if state.should_give_up() {
                return Err(CensusError::timeout(format!(
                    "sync run {} did not complete after {} polls ({:.1}s)",
                    sync_run_id,
                    state.attempts,
                    state.elapsed().as_secs_f64()
                )));
            }

            let delay = state.next_delay();
            debug!(sync_run_id, delay_ms = delay.as_millis() as u64, "waiting before next poll");
            tokio::time::sleep(delay).await;
        }
    }
}

//! Fluent builder for triggering a sync.

use std::time::Duration;

use census_core::{BackoffConfig, CensusClient, PollConfig, TriggerOptions, TriggerOutcome};

use crate::{Error, Result};

/// Builder for a sync trigger.
///
/// # Example
///
/// ```rust,ignore
/// let outcome = census
///     .trigger(1234)
///     .wait_for_completion()
///     .poll_every(Duration::from_secs(30))
///     .timeout(Duration::from_secs(3600))
///     .run()
///     .await?;
/// ```
pub struct TriggerBuilder<'a> {
    client: &'a CensusClient,
    sync_id: i64,
    options: TriggerOptions,
}

impl<'a> TriggerBuilder<'a> {
    pub(crate) fn new(client: &'a CensusClient, sync_id: i64) -> Self {
        Self {
            client,
            sync_id,
            options: TriggerOptions::default(),
        }
    }

    /// Reprocess all records instead of an incremental delta.
    pub fn force_full_sync(mut self, force: bool) -> Self {
        self.options.force_full_sync = force;
        self
    }

    /// Whether to wait for the sync run to complete.
    pub fn wait(mut self, wait: bool) -> Self {
        self.options.wait_for_sync_run_completed = wait;
        self
    }

    /// Wait for the sync run to complete.
    pub fn wait_for_completion(self) -> Self {
        self.wait(true)
    }

    /// Fixed delay between status polls (default: 10s).
    pub fn poll_every(mut self, interval: Duration) -> Self {
        self.options.poll.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Grow the delay between polls while the run is still going.
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.options.poll.backoff = Some(backoff);
        self
    }

    /// Give up waiting after this long.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.poll = self.options.poll.with_timeout(timeout);
        self
    }

    /// Give up waiting after this many polls.
    pub fn max_polls(mut self, max_polls: u32) -> Self {
        self.options.poll.max_attempts = max_polls;
        self
    }

    /// Replace the whole polling policy.
    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.options.poll = poll;
        self
    }

    /// Options this builder will send.
    pub fn options(&self) -> &TriggerOptions {
        &self.options
    }

    /// Trigger the sync.
    ///
    /// When waiting, a polling policy with a zero delay fails before the sync
    /// is triggered.
    pub async fn run(self) -> Result<TriggerOutcome> {
        self.client
            .trigger_sync_run(self.sync_id, &self.options)
            .await
            .map_err(Error::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use census_core::{CensusConfig, CensusCredentials, CensusError};

    fn client() -> CensusClient {
        let config = CensusConfig::default().with_base_url("http://127.0.0.1:1/api");
        CensusClient::with_config(CensusCredentials::new("foo"), config).unwrap()
    }

    #[test]
    fn test_defaults_match_trigger_options() {
        let client = client();
        let builder = TriggerBuilder::new(&client, 1234);
        assert_eq!(builder.options(), &TriggerOptions::default());
    }

    #[test]
    fn test_builder_sets_options() {
        let client = client();
        let builder = TriggerBuilder::new(&client, 1234)
            .force_full_sync(true)
            .wait_for_completion()
            .poll_every(Duration::from_secs(30))
            .timeout(Duration::from_secs(600))
            .max_polls(20);

        let options = builder.options();
        assert!(options.force_full_sync);
        assert!(options.wait_for_sync_run_completed);
        assert_eq!(options.poll.poll_interval_ms, 30_000);
        assert_eq!(options.poll.timeout(), Some(Duration::from_secs(600)));
        assert_eq!(options.poll.max_attempts, 20);
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let client = client();
        let builder = TriggerBuilder::new(&client, 1234).timeout(Duration::from_millis(250));
        assert_eq!(builder.options().poll.timeout(), Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_zero_interval_rejected_before_any_request() {
        let client = client();
        let err = TriggerBuilder::new(&client, 1234)
            .wait_for_completion()
            .poll_every(Duration::ZERO)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Core(CensusError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_zero_backoff_rejected_before_any_request() {
        let client = client();
        let err = TriggerBuilder::new(&client, 1234)
            .wait_for_completion()
            .backoff(BackoffConfig::new(0, 0, 4))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Core(CensusError::InvalidInput(_))));
    }
}

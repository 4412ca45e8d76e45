//! Polling policy for waiting on sync runs.
//!
//! The sync run loop asks a [`PollState`] how long to sleep and whether it
//! should give up. Interpreting run statuses stays in `api::syncs`; this module
//! only decides timing.
//!
//! The default policy reproduces the historical Census integration: a fixed
//! 10 second interval, no deadline, no attempt cap.

use std::time::{Duration, Instant};

use crate::CensusError;

/// Default delay between sync run polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Configuration for exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Base interval in milliseconds (default: 10000ms = 10s)
    pub base_interval_ms: u64,
    /// Maximum backoff in milliseconds (default: 120000ms = 2m)
    pub max_backoff_ms: u64,
    /// Maximum exponent for backoff calculation (default: 4, giving max multiplier of 16)
    pub max_exponent: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: DEFAULT_POLL_INTERVAL_SECS * 1000,
            max_backoff_ms: 120_000,
            max_exponent: 4,
        }
    }
}

impl BackoffConfig {
    /// Create a new backoff config with custom values.
    pub fn new(base_interval_ms: u64, max_backoff_ms: u64, max_exponent: u32) -> Self {
        Self {
            base_interval_ms,
            max_backoff_ms,
            max_exponent,
        }
    }
}

/// Calculate the delay after a given number of unfinished polls.
///
/// Formula: `min(base * 2^min(polls-1, max_exponent), max_backoff)`
///
/// # Example
///
/// ```
/// use census_core::polling::{BackoffConfig, calculate_backoff};
///
/// let config = BackoffConfig::new(1000, 60_000, 4);
///
/// assert_eq!(calculate_backoff(&config, 1).as_millis(), 1000);
/// assert_eq!(calculate_backoff(&config, 2).as_millis(), 2000);
/// assert_eq!(calculate_backoff(&config, 3).as_millis(), 4000);
/// ```
pub fn calculate_backoff(config: &BackoffConfig, polls: u32) -> Duration {
    if polls == 0 {
        return Duration::from_millis(config.base_interval_ms);
    }

    let exponent = (polls.saturating_sub(1)).min(config.max_exponent);
    let multiplier = 2u64.saturating_pow(exponent);
    let delay_ms = config
        .base_interval_ms
        .saturating_mul(multiplier)
        .min(config.max_backoff_ms);

    Duration::from_millis(delay_ms)
}

/// Configuration for a sync run polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed polling interval (milliseconds), used when `backoff` is unset
    pub poll_interval_ms: u64,
    /// Grow the interval between unfinished polls instead of keeping it fixed
    pub backoff: Option<BackoffConfig>,
    /// Overall timeout in milliseconds (0 = no timeout)
    pub timeout_ms: u64,
    /// Maximum number of polls (0 = unlimited)
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_SECS * 1000,
            backoff: None,
            timeout_ms: 0,
            max_attempts: 0,
        }
    }
}

impl PollConfig {
    /// Poll on a fixed interval.
    pub fn every(interval: Duration) -> Self {
        Self {
            poll_interval_ms: interval.as_millis() as u64,
            ..Default::default()
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Stop waiting after `timeout`. Sub-millisecond values round up to 1ms.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = if timeout.is_zero() {
            0
        } else {
            (timeout.as_millis() as u64).max(1)
        };
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Whether this policy can ever stop on its own.
    pub fn is_bounded(&self) -> bool {
        self.timeout_ms > 0 || self.max_attempts > 0
    }

    /// Overall deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Reject policies whose delay between polls can be zero.
    pub fn validate(&self) -> Result<(), CensusError> {
        let zero_delay = match &self.backoff {
            Some(backoff) => backoff.base_interval_ms == 0 || backoff.max_backoff_ms == 0,
            None => self.poll_interval_ms == 0,
        };
        if zero_delay {
            return Err(CensusError::InvalidInput(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// State tracker for a polling loop.
#[derive(Debug)]
pub struct PollState {
    /// Total number of polls made
    pub attempts: u32,
    /// Start time (for timeout tracking)
    start_time: Instant,
    /// Configuration
    config: PollConfig,
}

impl PollState {
    /// Create a new polling state.
    pub fn new(config: PollConfig) -> Self {
        Self {
            attempts: 0,
            start_time: Instant::now(),
            config,
        }
    }

    /// Record a poll that did not reach a terminal status.
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Check if the attempt cap has been reached.
    pub fn attempts_exhausted(&self) -> bool {
        self.config.max_attempts > 0 && self.attempts >= self.config.max_attempts
    }

    /// Check if we've timed out.
    pub fn is_timed_out(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.config
            .timeout()
            .map(|timeout| timeout.saturating_sub(self.start_time.elapsed()))
    }

    /// Check if the loop should stop waiting.
    pub fn should_give_up(&self) -> bool {
        self.attempts_exhausted() || self.is_timed_out()
    }

    /// Get the next delay to wait, never past the deadline.
    pub fn next_delay(&self) -> Duration {
        let delay = match &self.config.backoff {
            Some(backoff) => calculate_backoff(backoff, self.attempts),
            None => Duration::from_millis(self.config.poll_interval_ms),
        };
        match self.remaining() {
            Some(left) => delay.min(left),
            None => delay,
        }
    }

    /// Get elapsed time since polling started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff_default() {
        let config = BackoffConfig::default();

        assert_eq!(calculate_backoff(&config, 1).as_millis(), 10_000);
        assert_eq!(calculate_backoff(&config, 2).as_millis(), 20_000);
        assert_eq!(calculate_backoff(&config, 3).as_millis(), 40_000);
        assert_eq!(calculate_backoff(&config, 4).as_millis(), 80_000);

        // 10s * 16 = 160s, capped at 120s
        assert_eq!(calculate_backoff(&config, 5).as_millis(), 120_000);
        assert_eq!(calculate_backoff(&config, 10).as_millis(), 120_000);
    }

    #[test]
    fn test_calculate_backoff_zero_polls() {
        let config = BackoffConfig::default();
        assert_eq!(calculate_backoff(&config, 0).as_millis(), 10_000);
    }

    #[test]
    fn test_calculate_backoff_exponent_cap() {
        let config = BackoffConfig::new(1000, 1_000_000, 3);
        assert_eq!(calculate_backoff(&config, 4).as_millis(), 8000);
        // exponent capped at 3
        assert_eq!(calculate_backoff(&config, 5).as_millis(), 8000);
        assert_eq!(calculate_backoff(&config, 10).as_millis(), 8000);
    }

    #[test]
    fn test_default_poll_config_is_fixed_and_unbounded() {
        let config = PollConfig::default();
        assert_eq!(config.poll_interval_ms, 10_000);
        assert!(!config.is_bounded());

        let mut state = PollState::new(config);
        for _ in 0..1000 {
            state.record_attempt();
        }
        assert!(!state.should_give_up());
        assert_eq!(state.next_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_max_attempts() {
        let config = PollConfig::every(Duration::from_millis(5)).with_max_attempts(3);
        let mut state = PollState::new(config);

        state.record_attempt();
        state.record_attempt();
        assert!(!state.should_give_up());
        state.record_attempt();
        assert!(state.should_give_up());
    }

    #[test]
    fn test_backoff_delay_grows_with_attempts() {
        let config = PollConfig::default().with_backoff(BackoffConfig::new(100, 1000, 4));
        let mut state = PollState::new(config);

        state.record_attempt();
        assert_eq!(state.next_delay().as_millis(), 100);
        state.record_attempt();
        assert_eq!(state.next_delay().as_millis(), 200);
        state.record_attempt();
        assert_eq!(state.next_delay().as_millis(), 400);
    }

    #[test]
    fn test_timeout_not_reached() {
        let config = PollConfig::default().with_timeout(Duration::from_secs(3600));
        let state = PollState::new(config);
        assert!(!state.is_timed_out());
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let config = PollConfig::every(Duration::from_millis(10)).with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout_ms, 500);
        assert!(config.is_bounded());

        let config = PollConfig::default().with_timeout(Duration::from_micros(10));
        assert_eq!(config.timeout_ms, 1);
    }

    #[test]
    fn test_timeout_reached() {
        let config = PollConfig::every(Duration::from_millis(5)).with_timeout(Duration::from_millis(20));
        let state = PollState::new(config);
        std::thread::sleep(Duration::from_millis(30));
        assert!(state.is_timed_out());
        assert!(state.should_give_up());
    }

    #[test]
    fn test_delay_clamped_to_deadline() {
        let config = PollConfig::default().with_timeout(Duration::from_secs(15));
        let state = PollState::new(config);
        assert!(state.next_delay() <= Duration::from_secs(10));

        let config = PollConfig::default().with_timeout(Duration::from_secs(2));
        let state = PollState::new(config);
        assert!(state.next_delay() <= Duration::from_secs(2));
    }

    #[test]
    fn test_validate_rejects_zero_delay() {
        assert!(PollConfig::default().validate().is_ok());
        assert!(PollConfig::every(Duration::ZERO).validate().is_err());

        let zero_base = PollConfig::default().with_backoff(BackoffConfig::new(0, 1000, 4));
        assert!(matches!(zero_base.validate(), Err(CensusError::InvalidInput(_))));

        let zero_cap = PollConfig::default().with_backoff(BackoffConfig::new(100, 0, 4));
        assert!(zero_cap.validate().is_err());

        // A zero fixed interval is unused once backoff is set
        let backoff = PollConfig::every(Duration::ZERO).with_backoff(BackoffConfig::new(5, 50, 3));
        assert!(backoff.validate().is_ok());
    }
}

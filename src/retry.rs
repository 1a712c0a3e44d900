//! Retry policy shared by the address fetcher and the webhook notifier.

use std::time::Duration;

/// Configuration for bounded retries with (optionally) exponential backoff.
///
/// Controls how many times to attempt an operation and how long to wait
/// between attempts. The delay grows by `multiplier` after each retry and
/// is capped at `max_delay`; a multiplier of 1.0 gives a fixed delay.
///
/// The address fetcher uses a fixed-delay policy (probing an echo endpoint
/// either recovers within a couple of seconds or the network is down); the
/// webhook notifier uses backoff so a struggling receiver is not hammered.
///
/// # Example
///
/// ```
/// use ipwatch::retry::RetryPolicy;
/// use std::time::Duration;
///
/// // Three attempts, one second apart.
/// let fetch = RetryPolicy::fixed(3, Duration::from_secs(1));
/// assert_eq!(fetch.delay_for_retry(0), fetch.delay_for_retry(1));
///
/// // Backoff: 5s, 10s, 20s, ... capped at 60s.
/// let webhook = RetryPolicy::new()
///     .with_initial_delay(Duration::from_secs(5))
///     .with_max_delay(Duration::from_secs(60))
///     .with_multiplier(2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the initial one.
    ///
    /// A value of 1 means no retries.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Cap applied to every computed delay.
    pub max_delay: Duration,

    /// Factor applied to the delay after each retry. 1.0 keeps it fixed.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Default maximum attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Default initial delay (5 seconds).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);

    /// Default maximum delay (60 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Minimum value for `max_attempts`.
    pub const MIN_MAX_ATTEMPTS: u32 = 1;

    /// Creates a policy with the backoff defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
        }
    }

    /// Creates a fixed-delay policy: `max_attempts` tries, `delay` apart.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is less than 1.
    #[must_use]
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        assert!(
            max_attempts >= Self::MIN_MAX_ATTEMPTS,
            "max_attempts must be at least 1"
        );
        Self {
            max_attempts,
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
        }
    }

    /// Sets the maximum number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is less than 1.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(
            max_attempts >= Self::MIN_MAX_ATTEMPTS,
            "max_attempts must be at least 1"
        );
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay before the first retry.
    ///
    /// Zero is allowed (tight loop; mostly useful with
    /// [`InstantSleeper`](crate::time::InstantSleeper) in tests).
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the delay multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not positive.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Computes the delay before retry number `retry` (0-indexed), capped
    /// at `max_delay`.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        // Safe cast: retry counts stay tiny compared to i32::MAX
        #[allow(clippy::cast_possible_wrap)]
        let multiplier = self.multiplier.powi(retry as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Returns true if another attempt is allowed after attempt number
    /// `attempt` (1-indexed) has failed.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;

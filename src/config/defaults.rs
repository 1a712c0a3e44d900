//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default public-IP-echo endpoint.
pub const ENDPOINT: &str = "https://api.ipify.org";

/// Default per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default number of fetch attempts per check.
pub const FETCH_ATTEMPTS: u32 = 3;

/// Default delay between fetch attempts in seconds.
pub const FETCH_RETRY_DELAY_SECS: u64 = 1;

/// Default polling interval in seconds (also the Auto-mode settle delay).
pub const POLL_INTERVAL_SECS: u64 = 5;

/// Default short follow-up re-check delay in seconds.
pub const FOLLOW_UP_SHORT_SECS: u64 = 5;

/// Default long follow-up re-check delay in seconds.
pub const FOLLOW_UP_LONG_SECS: u64 = 15;

/// Whether notifications are enabled by default.
pub const NOTIFICATIONS_ENABLED: bool = true;

/// Default notification display duration in seconds.
pub const NOTIFICATION_DURATION_SECS: u64 = 10;

/// Default HTTP method for webhook deliveries.
pub const METHOD: &str = "POST";

/// Default maximum number of webhook retry attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default initial webhook retry delay in seconds.
pub const RETRY_INITIAL_DELAY_SECS: u64 = 5;

/// Default maximum webhook retry delay in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = 60;

/// Default webhook retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default per-request timeout as Duration.
#[must_use]
pub const fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

/// Default fetch retry delay as Duration.
#[must_use]
pub const fn fetch_retry_delay() -> Duration {
    Duration::from_secs(FETCH_RETRY_DELAY_SECS)
}

/// Default polling interval as Duration.
#[must_use]
pub const fn poll_interval() -> Duration {
    Duration::from_secs(POLL_INTERVAL_SECS)
}

/// Default notification duration as Duration.
#[must_use]
pub const fn notification_duration() -> Duration {
    Duration::from_secs(NOTIFICATION_DURATION_SECS)
}

/// Default initial webhook retry delay as Duration.
#[must_use]
pub const fn retry_initial_delay() -> Duration {
    Duration::from_secs(RETRY_INITIAL_DELAY_SECS)
}

/// Default maximum webhook retry delay as Duration.
#[must_use]
pub const fn retry_max_delay() -> Duration {
    Duration::from_secs(RETRY_MAX_DELAY_SECS)
}

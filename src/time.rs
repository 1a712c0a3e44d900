//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that allows injecting
//! instant (or otherwise controlled) delays in tests while using real
//! Tokio timers in production.

use std::time::Duration;

/// Abstraction over async sleeping for testability.
///
/// Retry loops take a `Sleeper` so tests can skip the inter-attempt
/// delays entirely instead of waiting them out.
///
/// # Example
///
/// ```
/// use ipwatch::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sleeper = InstantSleeper;
/// sleeper.sleep(Duration::from_secs(3600)).await; // returns immediately
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately, for tests that exercise retry
/// logic without paying for the delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn sleepers_are_send_sync() {
        assert_send_sync::<TokioSleeper>();
        assert_send_sync::<InstantSleeper>();
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_waits_for_duration() {
        let sleeper = TokioSleeper;
        let start = tokio::time::Instant::now();

        sleeper.sleep(Duration::from_secs(30)).await;

        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn instant_sleeper_returns_immediately() {
        let sleeper = InstantSleeper;
        let start = std::time::Instant::now();

        sleeper.sleep(Duration::from_secs(3600)).await;

        // No virtual clock here; an hour-long real sleep would hang the test.
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}

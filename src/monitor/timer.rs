//! Restartable one-shot timer backing the follow-up re-checks.

use std::time::Duration;

use tokio::task::JoinHandle;

/// A one-shot timer whose arming replaces any pending run.
///
/// `arm` cancels the previous schedule before starting a new one, so the
/// delay always counts from the most recent arm. That is exactly the
/// behavior the follow-up re-checks need: a burst of changes keeps
/// pushing the re-check window forward instead of firing once per change.
///
/// Dropping the timer cancels it.
///
/// # Example
///
/// ```no_run
/// use ipwatch::monitor::OneShotTimer;
/// use std::time::Duration;
///
/// # async fn example() {
/// let mut timer = OneShotTimer::new();
/// timer.arm(Duration::from_secs(5), || Box::pin(async {
///     println!("re-check");
/// }));
/// timer.cancel();
/// # }
/// ```
#[derive(Debug, Default)]
pub struct OneShotTimer {
    handle: Option<JoinHandle<()>>,
}

impl OneShotTimer {
    /// Creates an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Schedules `action` to run once after `delay`.
    ///
    /// A pending run is cancelled first; the new delay counts from now.
    /// Must be called from within a Tokio runtime.
    pub fn arm<F, Fut>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action().await;
        }));
    }

    /// Cancels the pending run, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Returns true while a run is scheduled but has not completed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for OneShotTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

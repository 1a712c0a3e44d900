//! The monitoring coordinator: owns the last known address, runs checks,
//! and turns detected changes into presentation updates.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::network::{AddressFetcher, PublicIp};
use crate::notify::PresentationSink;

use super::timer::OneShotTimer;
use super::trigger::Trigger;

/// Display label used while no address can be determined.
pub const NO_CONNECTION_LABEL: &str = "No Connection";

/// Notification title for an address change.
pub const ADDRESS_CHANGED_TITLE: &str = "IP Address Changed";

/// Notification title for a lost connection.
pub const CONNECTION_LOST_TITLE: &str = "Connection Lost";

/// Default polling interval; doubles as the Auto-mode settle delay.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default delay of the short follow-up re-check.
pub const DEFAULT_FOLLOW_UP_SHORT: Duration = Duration::from_secs(5);

/// Default delay of the long follow-up re-check.
pub const DEFAULT_FOLLOW_UP_LONG: Duration = Duration::from_secs(15);

/// Default transient-notification display duration.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(10);

/// How checks are triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorMode {
    /// React to network topology change events.
    Auto,
    /// Poll on a fixed interval.
    Timed,
}

impl std::fmt::Display for MonitorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Timed => f.write_str("timed"),
        }
    }
}

/// Settings the coordinator runs with, immutable for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOptions {
    /// Trigger mode.
    pub mode: MonitorMode,

    /// Polling period in Timed mode; settle delay before the fetch in
    /// Auto mode.
    pub poll_interval: Duration,

    /// Delay of the short follow-up re-check after a change.
    pub follow_up_short: Duration,

    /// Delay of the long follow-up re-check after a change.
    pub follow_up_long: Duration,

    /// Whether changes may emit transient notifications.
    pub notifications_enabled: bool,

    /// How long a transient notification stays visible.
    pub notification_duration: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            mode: MonitorMode::Timed,
            poll_interval: DEFAULT_POLL_INTERVAL,
            follow_up_short: DEFAULT_FOLLOW_UP_SHORT,
            follow_up_long: DEFAULT_FOLLOW_UP_LONG,
            notifications_enabled: true,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }
}

/// How a single check ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Another check was already in flight; this one was dropped.
    Skipped,
    /// The fetched value equals the last known one; nothing happened.
    Unchanged,
    /// The address transitioned to the contained value.
    Changed(PublicIp),
    /// The fetch failed unexpectedly; state was left untouched.
    Failed,
}

/// Coordinates address checks against a fetcher and a presentation sink.
///
/// At most one check runs at a time: triggers arriving while a check is
/// in flight are dropped, not queued. A check fetches the current public
/// address, compares it with the last known value, and on a difference
/// updates the sink's display text, optionally notifies, and optionally
/// arms two follow-up re-checks to catch further movement while the
/// network settles. See [`Trigger`] for which checks may notify and
/// follow up.
///
/// The coordinator is handed out as an `Arc` because the follow-up
/// timers call back into it from spawned tasks.
///
/// # Example
///
/// ```no_run
/// use ipwatch::monitor::{MonitorCoordinator, MonitorOptions, Trigger};
/// use ipwatch::network::{EchoFetcher, ReqwestClient};
/// use ipwatch::notify::ConsoleSink;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = Url::parse("https://api.ipify.org")?;
/// let fetcher = EchoFetcher::new(ReqwestClient::new(), endpoint);
/// let coordinator =
///     MonitorCoordinator::new(MonitorOptions::default(), fetcher, ConsoleSink::new());
///
/// // Establish the initial display state, silently.
/// coordinator.check(Trigger::Startup).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MonitorCoordinator<F, P> {
    fetcher: F,
    sink: P,
    options: MonitorOptions,
    last_known: Mutex<PublicIp>,
    in_flight: AtomicBool,
    follow_up_short: Mutex<OneShotTimer>,
    follow_up_long: Mutex<OneShotTimer>,
}

impl<F, P> MonitorCoordinator<F, P>
where
    F: AddressFetcher + 'static,
    P: PresentationSink + 'static,
{
    /// Creates a coordinator with no address observed yet.
    ///
    /// The follow-up timers start idle; nothing runs until a trigger
    /// invokes [`check`](Self::check).
    pub fn new(options: MonitorOptions, fetcher: F, sink: P) -> Arc<Self> {
        Arc::new(Self {
            fetcher,
            sink,
            options,
            last_known: Mutex::new(PublicIp::NoConnection),
            in_flight: AtomicBool::new(false),
            follow_up_short: Mutex::new(OneShotTimer::new()),
            follow_up_long: Mutex::new(OneShotTimer::new()),
        })
    }

    /// The settings this coordinator runs with.
    #[must_use]
    pub const fn options(&self) -> &MonitorOptions {
        &self.options
    }

    /// The last value a completed check observed.
    #[must_use]
    pub fn last_known(&self) -> PublicIp {
        self.lock_last_known().clone()
    }

    /// Performs one check, or drops it if one is already running.
    ///
    /// The single-flight flag is held for the whole check but the lock
    /// protecting it is never held across I/O; competing triggers fail
    /// the flag acquisition and return [`CheckOutcome::Skipped`]
    /// immediately. In Auto mode the check sleeps the poll interval
    /// before fetching so a just-changed interface can settle.
    pub async fn check(self: &Arc<Self>, trigger: Trigger) -> CheckOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!(
                "Dropping {} trigger, a check is already in flight",
                trigger.label()
            );
            return CheckOutcome::Skipped;
        };

        tracing::debug!("Checking public address ({})", trigger.label());

        if self.options.mode == MonitorMode::Auto {
            tokio::time::sleep(self.options.poll_interval).await;
        }

        let fetched = match self.fetcher.fetch().await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Check abandoned, address fetch failed: {e}");
                return CheckOutcome::Failed;
            }
        };

        let changed = {
            let mut last = self.lock_last_known();
            if *last == fetched {
                false
            } else {
                *last = fetched.clone();
                true
            }
        };

        if !changed {
            tracing::debug!("Public address unchanged ({fetched})");
            return CheckOutcome::Unchanged;
        }

        tracing::info!("Public address is now: {fetched}");
        self.apply_transition(&fetched, trigger).await;

        CheckOutcome::Changed(fetched)
    }

    /// Pushes one transition into the sink and arms follow-ups.
    ///
    /// Runs inside the single-flight section, so transitions reach the
    /// sink in the order they were detected.
    async fn apply_transition(self: &Arc<Self>, value: &PublicIp, trigger: Trigger) {
        let display = display_text(value);
        self.sink.set_display_text(&display).await;

        if trigger.should_notify(self.options.notifications_enabled) {
            let (title, body) = match value {
                PublicIp::NoConnection => (CONNECTION_LOST_TITLE, String::new()),
                PublicIp::Address(_) => (ADDRESS_CHANGED_TITLE, display),
            };
            self.sink
                .show_notification(title, &body, self.options.notification_duration)
                .await;
        }

        if trigger.should_follow_up() {
            self.arm_follow_ups();
        }
    }

    /// (Re)arms both follow-up timers.
    ///
    /// A pending timer is stopped and restarted, so the re-check window
    /// always counts from the most recent change.
    fn arm_follow_ups(self: &Arc<Self>) {
        let timers = [
            (&self.follow_up_short, self.options.follow_up_short),
            (&self.follow_up_long, self.options.follow_up_long),
        ];

        for (timer, delay) in timers {
            let coordinator = Arc::clone(self);
            timer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .arm(delay, move || -> Pin<Box<dyn Future<Output = ()> + Send>> {
                    Box::pin(async move {
                        coordinator.check(Trigger::FollowUp).await;
                    })
                });
        }
    }

    /// Cancels the follow-up timers. Idempotent; also runs on drop.
    ///
    /// The poll timer and the change subscription live with the trigger
    /// loop that drives this coordinator and stop when that loop does.
    pub fn shutdown(&self) {
        self.follow_up_short
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
        self.follow_up_long
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Locks the last-known value, healing a poisoned lock.
    ///
    /// A panicking check must not wedge the monitor forever; the stored
    /// value is a plain enum and stays valid.
    fn lock_last_known(&self) -> std::sync::MutexGuard<'_, PublicIp> {
        self.last_known.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Renders the persistent display text for a value.
fn display_text(value: &PublicIp) -> String {
    match value {
        PublicIp::Address(addr) => format!("IP: {addr}"),
        PublicIp::NoConnection => NO_CONNECTION_LABEL.to_string(),
    }
}

/// RAII ownership of the single-flight flag.
///
/// Acquisition is a single compare-exchange; release happens on drop, so
/// every exit path of a check clears the flag, including panics.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

//! Tests for `MonitorCoordinator`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::network::{AddressFetcher, FetchError, PublicIp};
use crate::notify::PresentationSink;

use super::coordinator::{
    ADDRESS_CHANGED_TITLE, CONNECTION_LOST_TITLE, CheckOutcome, MonitorCoordinator, MonitorMode,
    MonitorOptions, NO_CONNECTION_LABEL,
};
use super::trigger::Trigger;

/// Fetcher returning a scripted sequence of results.
///
/// Once the script runs out it keeps returning the last scripted value.
#[derive(Debug)]
struct MockFetcher {
    script: std::sync::Mutex<VecDeque<Result<PublicIp, String>>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    fn new(script: Vec<Result<PublicIp, String>>) -> Arc<Self> {
        Arc::new(Self {
            script: std::sync::Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn addresses(values: &[&str]) -> Arc<Self> {
        Self::new(values.iter().map(|v| Ok(PublicIp::address(*v))).collect())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressFetcher for Arc<MockFetcher> {
    async fn fetch(&self) -> Result<PublicIp, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let result = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap_or(Ok(PublicIp::NoConnection))
        };
        result.map_err(|message| FetchError::Unexpected { message })
    }
}

/// Fetcher that blocks until the test opens its gate.
#[derive(Debug)]
struct GatedFetcher {
    gate: tokio::sync::Semaphore,
    calls: AtomicUsize,
}

impl GatedFetcher {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: tokio::sync::Semaphore::new(0),
            calls: AtomicUsize::new(0),
        })
    }

    fn open(&self) {
        self.gate.add_permits(1);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressFetcher for Arc<GatedFetcher> {
    async fn fetch(&self) -> Result<PublicIp, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.acquire().await.unwrap().forget();
        Ok(PublicIp::address("203.0.113.5"))
    }
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Notification {
    title: String,
    body: String,
    duration: Duration,
}

/// Sink recording every call for later assertions.
#[derive(Debug, Default)]
struct RecordingSink {
    displays: std::sync::Mutex<Vec<String>>,
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn displays(&self) -> Vec<String> {
        self.displays.lock().unwrap().clone()
    }

    fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.displays.lock().unwrap().len() + self.notifications.lock().unwrap().len()
    }
}

impl PresentationSink for Arc<RecordingSink> {
    async fn set_display_text(&self, text: &str) {
        self.displays.lock().unwrap().push(text.to_string());
    }

    async fn show_notification(&self, title: &str, body: &str, duration: Duration) {
        self.notifications.lock().unwrap().push(Notification {
            title: title.to_string(),
            body: body.to_string(),
            duration,
        });
    }
}

fn timed_options() -> MonitorOptions {
    MonitorOptions {
        mode: MonitorMode::Timed,
        poll_interval: Duration::from_secs(1),
        ..MonitorOptions::default()
    }
}

/// Lets spawned follow-up tasks run after a virtual-time jump.
async fn drain_tasks() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

mod change_detection {
    use super::*;

    #[tokio::test]
    async fn unchanged_value_touches_nothing() {
        // Initial state is the sentinel; fetching the sentinel is a no-op.
        let fetcher = MockFetcher::new(vec![Ok(PublicIp::NoConnection)]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        let outcome = coordinator.check(Trigger::PollTick).await;

        assert_eq!(outcome, CheckOutcome::Unchanged);
        assert_eq!(sink.call_count(), 0);
        assert_eq!(coordinator.last_known(), PublicIp::NoConnection);
    }

    #[tokio::test]
    async fn repeated_address_updates_only_once() {
        let fetcher = MockFetcher::addresses(&["1.2.3.4", "1.2.3.4"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        assert_eq!(
            coordinator.check(Trigger::PollTick).await,
            CheckOutcome::Changed(PublicIp::address("1.2.3.4"))
        );
        assert_eq!(
            coordinator.check(Trigger::PollTick).await,
            CheckOutcome::Unchanged
        );

        assert_eq!(sink.displays(), vec!["IP: 1.2.3.4"]);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_untouched() {
        let fetcher = MockFetcher::new(vec![
            Err("socket exploded".to_string()),
            Ok(PublicIp::address("1.2.3.4")),
        ]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        let outcome = coordinator.check(Trigger::PollTick).await;

        assert_eq!(outcome, CheckOutcome::Failed);
        assert_eq!(coordinator.last_known(), PublicIp::NoConnection);
        assert_eq!(sink.call_count(), 0);

        // The failure did not wedge the coordinator; the next check runs.
        let outcome = coordinator.check(Trigger::PollTick).await;
        assert_eq!(outcome, CheckOutcome::Changed(PublicIp::address("1.2.3.4")));
    }
}

mod single_flight {
    use super::*;

    #[tokio::test]
    async fn concurrent_trigger_is_dropped_without_fetching() {
        let fetcher = GatedFetcher::new();
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.check(Trigger::PollTick).await })
        };

        // Let the first check reach the blocked fetch.
        while fetcher.calls() == 0 {
            tokio::task::yield_now().await;
        }

        let second = coordinator.check(Trigger::PollTick).await;
        assert_eq!(second, CheckOutcome::Skipped);
        assert_eq!(fetcher.calls(), 1);

        fetcher.open();
        let first = first.await.unwrap();
        assert_eq!(first, CheckOutcome::Changed(PublicIp::address("203.0.113.5")));
    }

    #[tokio::test]
    async fn flag_clears_after_completion() {
        let fetcher = MockFetcher::addresses(&["1.2.3.4", "5.6.7.8"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::PollTick).await;
        let outcome = coordinator.check(Trigger::PollTick).await;

        assert_eq!(outcome, CheckOutcome::Changed(PublicIp::address("5.6.7.8")));
        assert_eq!(fetcher.calls(), 2);
    }
}

mod notifications {
    use super::*;

    #[tokio::test]
    async fn address_change_notifies_with_changed_framing() {
        let fetcher = MockFetcher::addresses(&["203.0.113.5"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::PollTick).await;

        assert_eq!(sink.displays(), vec!["IP: 203.0.113.5"]);
        let notifications = sink.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, ADDRESS_CHANGED_TITLE);
        assert!(notifications[0].body.contains("203.0.113.5"));
        assert_eq!(notifications[0].duration, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn connection_loss_notifies_with_lost_framing() {
        let fetcher = MockFetcher::new(vec![
            Ok(PublicIp::address("1.2.3.4")),
            Ok(PublicIp::NoConnection),
        ]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::Startup).await;
        coordinator.check(Trigger::PollTick).await;

        assert_eq!(sink.displays(), vec!["IP: 1.2.3.4", NO_CONNECTION_LABEL]);
        let notifications = sink.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, CONNECTION_LOST_TITLE);
        assert!(notifications[0].body.is_empty());
    }

    #[tokio::test]
    async fn startup_check_updates_display_but_stays_silent() {
        let fetcher = MockFetcher::addresses(&["1.2.3.4"]);
        let sink = RecordingSink::new();
        let options = MonitorOptions {
            notifications_enabled: true,
            ..timed_options()
        };
        let coordinator =
            MonitorCoordinator::new(options, Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::Startup).await;

        assert_eq!(sink.displays(), vec!["IP: 1.2.3.4"]);
        assert!(sink.notifications().is_empty());
    }

    #[tokio::test]
    async fn disabled_notifications_still_update_the_display() {
        let fetcher = MockFetcher::addresses(&["1.2.3.4"]);
        let sink = RecordingSink::new();
        let options = MonitorOptions {
            notifications_enabled: false,
            ..timed_options()
        };
        let coordinator =
            MonitorCoordinator::new(options, Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::PollTick).await;

        assert_eq!(sink.displays(), vec!["IP: 1.2.3.4"]);
        assert!(sink.notifications().is_empty());
    }
}

mod follow_ups {
    use super::*;

    fn follow_up_options() -> MonitorOptions {
        MonitorOptions {
            mode: MonitorMode::Timed,
            poll_interval: Duration::from_secs(60),
            follow_up_short: Duration::from_secs(5),
            follow_up_long: Duration::from_secs(15),
            notifications_enabled: false,
            ..MonitorOptions::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn change_arms_both_follow_up_checks() {
        let fetcher = MockFetcher::addresses(&["1.1.1.1", "2.2.2.2", "3.3.3.3"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(follow_up_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::NetworkChange).await;
        assert_eq!(fetcher.calls(), 1);

        // Short follow-up at t=5.
        tokio::time::sleep(Duration::from_secs(6)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 2);

        // Long follow-up at t=15.
        tokio::time::sleep(Duration::from_secs(10)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 3);

        // Follow-up checks do not re-arm even though they saw changes.
        tokio::time::sleep(Duration::from_secs(60)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn second_change_restarts_the_follow_up_window() {
        let fetcher = MockFetcher::addresses(&["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(follow_up_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::NetworkChange).await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        coordinator.check(Trigger::NetworkChange).await;
        assert_eq!(fetcher.calls(), 2);

        // t=7: the first arming would have fired its short timer at t=5,
        // but the second change restarted the window.
        tokio::time::sleep(Duration::from_secs(4)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 2);

        // t=9: short follow-up of the second change (t=3+5=8) has fired.
        tokio::time::sleep(Duration::from_secs(2)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 3);

        // t=19: long follow-up of the second change (t=3+15=18) has fired.
        tokio::time::sleep(Duration::from_secs(10)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_ticks_do_not_arm_follow_ups() {
        let fetcher = MockFetcher::addresses(&["1.1.1.1"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(follow_up_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::PollTick).await;
        assert_eq!(fetcher.calls(), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_follow_ups() {
        let fetcher = MockFetcher::addresses(&["1.1.1.1", "2.2.2.2"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(follow_up_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        coordinator.check(Trigger::NetworkChange).await;
        coordinator.shutdown();
        coordinator.shutdown(); // idempotent

        tokio::time::sleep(Duration::from_secs(60)).await;
        drain_tasks().await;
        assert_eq!(fetcher.calls(), 1);
    }
}

mod settle_delay {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn auto_mode_waits_the_poll_interval_before_fetching() {
        let fetcher = MockFetcher::addresses(&["1.2.3.4"]);
        let sink = RecordingSink::new();
        let options = MonitorOptions {
            mode: MonitorMode::Auto,
            poll_interval: Duration::from_secs(5),
            ..MonitorOptions::default()
        };
        let coordinator =
            MonitorCoordinator::new(options, Arc::clone(&fetcher), Arc::clone(&sink));

        let start = tokio::time::Instant::now();
        coordinator.check(Trigger::NetworkChange).await;

        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn timed_mode_fetches_immediately() {
        let fetcher = MockFetcher::addresses(&["1.2.3.4"]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        let start = tokio::time::Instant::now();
        coordinator.check(Trigger::PollTick).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

mod scenario {
    use super::*;

    /// Timed mode, three ticks: new address, same address, connection
    /// lost. Two display updates, two notifications, correct framing.
    #[tokio::test]
    async fn poll_sequence_reports_each_transition_exactly_once() {
        let fetcher = MockFetcher::new(vec![
            Ok(PublicIp::address("1.2.3.4")),
            Ok(PublicIp::address("1.2.3.4")),
            Ok(PublicIp::NoConnection),
        ]);
        let sink = RecordingSink::new();
        let coordinator =
            MonitorCoordinator::new(timed_options(), Arc::clone(&fetcher), Arc::clone(&sink));

        assert_eq!(
            coordinator.check(Trigger::PollTick).await,
            CheckOutcome::Changed(PublicIp::address("1.2.3.4"))
        );
        assert_eq!(
            coordinator.check(Trigger::PollTick).await,
            CheckOutcome::Unchanged
        );
        assert_eq!(
            coordinator.check(Trigger::PollTick).await,
            CheckOutcome::Changed(PublicIp::NoConnection)
        );

        assert_eq!(sink.displays(), vec!["IP: 1.2.3.4", NO_CONNECTION_LABEL]);

        let notifications = sink.notifications();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].title, ADDRESS_CHANGED_TITLE);
        assert_eq!(notifications[0].body, "IP: 1.2.3.4");
        assert_eq!(notifications[1].title, CONNECTION_LOST_TITLE);
    }
}

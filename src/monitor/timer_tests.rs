//! Tests for `OneShotTimer`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::OneShotTimer;

/// Counter bumped by timer actions so tests can observe fires.
///
/// `use<>` keeps the closure free of the borrow's lifetime so it
/// satisfies the timer's `'static` bound.
fn counter_action(
    counter: &Arc<AtomicUsize>,
) -> impl FnOnce() -> std::future::Ready<()> + Send + use<> {
    let counter = Arc::clone(counter);
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        std::future::ready(())
    }
}

/// Lets spawned timer tasks run after a virtual-time jump.
async fn drain_tasks() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn fires_once_after_delay() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut timer = OneShotTimer::new();

    timer.arm(Duration::from_secs(5), counter_action(&fired));

    tokio::time::sleep(Duration::from_secs(4)).await;
    drain_tasks().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    drain_tasks().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // One-shot: nothing more happens.
    tokio::time::sleep(Duration::from_secs(60)).await;
    drain_tasks().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn rearm_counts_from_the_most_recent_arm() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut timer = OneShotTimer::new();

    timer.arm(Duration::from_secs(5), counter_action(&fired));
    tokio::time::sleep(Duration::from_secs(3)).await;
    timer.arm(Duration::from_secs(5), counter_action(&fired));

    // t=7: the original schedule would have fired at t=5.
    tokio::time::sleep(Duration::from_secs(4)).await;
    drain_tasks().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    // t=9: one second past the re-armed deadline at t=8.
    tokio::time::sleep(Duration::from_secs(2)).await;
    drain_tasks().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_prevents_the_fire() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut timer = OneShotTimer::new();

    timer.arm(Duration::from_secs(5), counter_action(&fired));
    timer.cancel();

    tokio::time::sleep(Duration::from_secs(60)).await;
    drain_tasks().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_is_idempotent() {
    let mut timer = OneShotTimer::new();

    timer.cancel();
    timer.arm(Duration::from_secs(5), || std::future::ready(()));
    timer.cancel();
    timer.cancel();

    assert!(!timer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn drop_cancels_the_pending_run() {
    let fired = Arc::new(AtomicUsize::new(0));

    {
        let mut timer = OneShotTimer::new();
        timer.arm(Duration::from_secs(5), counter_action(&fired));
    }

    tokio::time::sleep(Duration::from_secs(60)).await;
    drain_tasks().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn is_pending_tracks_the_lifecycle() {
    let mut timer = OneShotTimer::new();
    assert!(!timer.is_pending());

    timer.arm(Duration::from_secs(5), || std::future::ready(()));
    assert!(timer.is_pending());

    tokio::time::sleep(Duration::from_secs(6)).await;
    drain_tasks().await;
    assert!(!timer.is_pending());
}

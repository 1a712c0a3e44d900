//! Application execution logic.
//!
//! This module wires the validated configuration into a running monitor:
//! it builds the fetcher and presentation sinks, performs the startup
//! check, and drives the trigger loop until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;
use tokio::time::{Interval, MissedTickBehavior};
#[cfg(windows)]
use tokio_stream::StreamExt;

use ipwatch::config::ValidatedConfig;
use ipwatch::monitor::{MonitorCoordinator, MonitorMode, MonitorOptions, SourceError, Trigger};
use ipwatch::network::{AddressFetcher, EchoFetcher, ReqwestClient};
use ipwatch::notify::{ConsoleSink, PresentationSink, WebhookSink};

#[cfg(windows)]
use ipwatch::monitor::{NetworkChangeSource, platform::PlatformChangeSource};

/// Fetcher used by the running application.
type AppFetcher = EchoFetcher<ReqwestClient>;

/// Presentation sinks used by the running application.
type AppSink = (ConsoleSink, Option<WebhookSink<ReqwestClient>>);

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientCreation(#[source] reqwest::Error),

    /// Failed to subscribe to network change notifications.
    #[error("Failed to subscribe to network changes: {0}")]
    ChangeSource(#[source] SourceError),

    /// Unexpected change-stream termination.
    #[error("Network change stream terminated unexpectedly")]
    StreamTerminated,
}

/// Executes the main application loop.
///
/// This function:
/// 1. Builds the echo fetcher from the configured endpoint
/// 2. Builds the presentation sinks (console, optional webhook)
/// 3. Runs a startup check to establish the baseline address
/// 4. Drives triggers from the configured source (network events or a
///    fixed-interval ticker) until a shutdown signal (Ctrl+C / SIGTERM)
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client fails to build
/// - The network change subscription fails (in auto mode)
/// - The change stream terminates unexpectedly
///
/// # Coverage Note
///
/// Excluded from coverage: requires a real async runtime with signal
/// handling and, in auto mode, platform network APIs.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let client =
        ReqwestClient::with_timeout(config.request_timeout).map_err(RunError::ClientCreation)?;
    let fetcher: AppFetcher = EchoFetcher::new(client, config.endpoint.clone())
        .with_retry_policy(config.fetch_retry_policy());

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - webhook deliveries will be logged but not sent");
    }

    let sink: AppSink = (ConsoleSink::new(), build_webhook(&config));
    let options = MonitorOptions::from(&config);

    // Auto mode needs platform change notifications; elsewhere the run
    // degrades to timed checks, settle delay included.
    #[cfg(not(windows))]
    let options = {
        let mut options = options;
        if options.mode == MonitorMode::Auto {
            tracing::warn!(
                "Auto mode is not supported on this platform, falling back to timed checks"
            );
            options.mode = MonitorMode::Timed;
        }
        options
    };

    let mode = options.mode;
    let poll_interval = options.poll_interval;

    let coordinator = MonitorCoordinator::new(options, fetcher, sink);

    // Establish the baseline before any trigger can fire.
    coordinator.check(Trigger::Startup).await;

    let result = match mode {
        MonitorMode::Timed => {
            tracing::info!(
                "Timed mode enabled (checking every {}s)",
                poll_interval.as_secs()
            );
            run_timed_loop(&coordinator).await
        }
        MonitorMode::Auto => run_auto_loop(&coordinator).await,
    };

    coordinator.shutdown();
    result
}

/// Builds the webhook sink when a delivery URL is configured.
fn build_webhook(config: &ValidatedConfig) -> Option<WebhookSink<ReqwestClient>> {
    let webhook = config.webhook.as_ref()?;

    let mut sink = WebhookSink::new(ReqwestClient::new(), webhook.url.clone())
        .with_method(webhook.method.clone())
        .with_headers(webhook.headers.clone())
        .with_retry_policy(webhook.retry_policy.clone())
        .with_dry_run(config.dry_run);

    if let Some(ref template) = webhook.body_template {
        sink = sink.with_body_template(template);
    }

    Some(sink)
}

/// Runs checks on a fixed interval until shutdown.
///
/// Excluded from coverage - requires signal handling.
#[cfg(not(tarpaulin_include))]
async fn run_timed_loop<F, P>(coordinator: &Arc<MonitorCoordinator<F, P>>) -> Result<(), RunError>
where
    F: AddressFetcher + 'static,
    P: PresentationSink + 'static,
{
    let mut ticker = poll_ticker(coordinator.options().poll_interval);
    // The first tick completes immediately; the startup check covered it.
    ticker.tick().await;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            _ = ticker.tick() => {
                coordinator.check(Trigger::PollTick).await;
            }
        }
    }
}

/// Builds the timed-mode ticker.
///
/// Ticks missed while a check outlasts the interval are skipped, not
/// replayed: triggers are dropped, never queued.
fn poll_ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Runs checks on network change events until shutdown.
///
/// Each event dispatches a check on its own task so that bursts of
/// events are absorbed by the in-flight guard instead of queueing.
///
/// Excluded from coverage - requires Windows API and signal handling.
#[cfg(not(tarpaulin_include))]
#[cfg(windows)]
async fn run_auto_loop<F, P>(coordinator: &Arc<MonitorCoordinator<F, P>>) -> Result<(), RunError>
where
    F: AddressFetcher + 'static,
    P: PresentationSink + 'static,
{
    let source = PlatformChangeSource::new().map_err(RunError::ChangeSource)?;
    let mut stream = source.into_stream();

    tracing::info!("Auto mode enabled (watching for network changes)");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            event = stream.next() => {
                match event {
                    Some(Ok(())) => {
                        let coordinator = Arc::clone(coordinator);
                        tokio::spawn(async move {
                            coordinator.check(Trigger::NetworkChange).await;
                        });
                    }
                    Some(Err(e)) => return Err(RunError::ChangeSource(e)),
                    None => return Err(RunError::StreamTerminated),
                }
            }
        }
    }
}

/// Non-Windows fallback for auto mode.
///
/// `execute` downgrades the mode before it gets here; this keeps the
/// match arm compiling on platforms without a change source.
///
/// Excluded from coverage - requires signal handling.
#[cfg(not(tarpaulin_include))]
#[cfg(not(windows))]
async fn run_auto_loop<F, P>(coordinator: &Arc<MonitorCoordinator<F, P>>) -> Result<(), RunError>
where
    F: AddressFetcher + 'static,
    P: PresentationSink + 'static,
{
    run_timed_loop(coordinator).await
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

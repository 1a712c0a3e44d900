//! Presentation layer: where the monitor's observations become visible.
//!
//! The coordinator talks to a [`PresentationSink`]: a persistent display
//! text plus transient notifications. Two implementations ship here,
//! [`ConsoleSink`] for stdout and [`WebhookSink`] for HTTP delivery, and
//! tuples / `Option` compose them so the run wiring can fan out to both
//! with a single concrete type.

use std::time::Duration;

mod console;
mod error;
mod webhook;


pub use console::ConsoleSink;
pub use error::{AttemptError, NotifyError};
pub use webhook::{IsRetryable, WebhookSink};

/// Presentation surface for the monitor.
///
/// Calls are fire-and-forget: implementations deal with their own
/// failures (typically by logging) and never report them back. The
/// coordinator awaits each call inside its single-flight section, so
/// per-transition ordering is total.
pub trait PresentationSink: Send + Sync {
    /// Updates the persistent display text.
    fn set_display_text(&self, text: &str) -> impl Future<Output = ()> + Send;

    /// Shows one transient notification for roughly `duration`.
    fn show_notification(
        &self,
        title: &str,
        body: &str,
        duration: Duration,
    ) -> impl Future<Output = ()> + Send;
}

/// Fans every call out to both halves, left first.
impl<A: PresentationSink, B: PresentationSink> PresentationSink for (A, B) {
    async fn set_display_text(&self, text: &str) {
        self.0.set_display_text(text).await;
        self.1.set_display_text(text).await;
    }

    async fn show_notification(&self, title: &str, body: &str, duration: Duration) {
        self.0.show_notification(title, body, duration).await;
        self.1.show_notification(title, body, duration).await;
    }
}

/// Forwards when present, does nothing when `None`.
impl<S: PresentationSink> PresentationSink for Option<S> {
    async fn set_display_text(&self, text: &str) {
        if let Some(sink) = self {
            sink.set_display_text(text).await;
        }
    }

    async fn show_notification(&self, title: &str, body: &str, duration: Duration) {
        if let Some(sink) = self {
            sink.show_notification(title, body, duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        displays: Mutex<Vec<String>>,
        notifications: Mutex<Vec<String>>,
    }

    impl PresentationSink for &RecordingSink {
        async fn set_display_text(&self, text: &str) {
            self.displays.lock().unwrap().push(text.to_string());
        }

        async fn show_notification(&self, title: &str, _body: &str, _duration: Duration) {
            self.notifications.lock().unwrap().push(title.to_string());
        }
    }

    #[tokio::test]
    async fn tuple_fans_out_to_both_sinks() {
        let left = RecordingSink::default();
        let right = RecordingSink::default();
        let sink = (&left, &right);

        sink.set_display_text("IP: 1.2.3.4").await;
        sink.show_notification("changed", "IP: 1.2.3.4", Duration::from_secs(10))
            .await;

        assert_eq!(left.displays.lock().unwrap().len(), 1);
        assert_eq!(right.displays.lock().unwrap().len(), 1);
        assert_eq!(left.notifications.lock().unwrap().len(), 1);
        assert_eq!(right.notifications.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn option_forwards_only_when_some() {
        let inner = RecordingSink::default();

        let some_sink = Some(&inner);
        some_sink.set_display_text("a").await;
        assert_eq!(inner.displays.lock().unwrap().len(), 1);

        let none_sink: Option<&RecordingSink> = None;
        none_sink.set_display_text("b").await;
        none_sink
            .show_notification("t", "b", Duration::from_secs(1))
            .await;
        // Nothing to observe; reaching here without a panic is the test.
    }
}

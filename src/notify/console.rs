//! Console presentation sink.

use std::time::Duration;

use super::PresentationSink;

/// Writes presentation updates to standard output.
///
/// The headless stand-in for a tray icon: display-text changes become
/// plain status lines, notifications become bracketed alert lines. The
/// display duration has no meaning on a terminal and is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Creates a console sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PresentationSink for ConsoleSink {
    async fn set_display_text(&self, text: &str) {
        println!("{text}");
    }

    async fn show_notification(&self, title: &str, body: &str, _duration: Duration) {
        if body.is_empty() {
            println!("[{title}]");
        } else {
            println!("[{title}] {body}");
        }
    }
}

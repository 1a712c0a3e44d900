//! Error types for the monitor layer.

use thiserror::Error;

/// Error type for network-change sources.
///
/// Represents failures in platform-specific change notification APIs.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// The change source stopped delivering events.
    ///
    /// This can happen when the underlying event stream terminates
    /// without an explicit shutdown request.
    #[error("Change source stopped unexpectedly")]
    Stopped,
}

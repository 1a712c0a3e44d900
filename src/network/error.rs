//! Error types for transport and address resolution.

use thiserror::Error;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// Callers decide which of these warrant a retry.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not respond within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This indicates a configuration error rather than a transient
    /// failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error type for [`AddressFetcher`](super::AddressFetcher) failures
/// outside the fetch contract.
///
/// Ordinary network trouble never surfaces here: a fetcher converts it
/// into [`PublicIp::NoConnection`](super::PublicIp::NoConnection) once its
/// retry budget is spent. The monitor logs these errors and leaves its
/// state untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher failed in a way its own retry handling does not cover.
    #[error("Address lookup failed: {message}")]
    Unexpected {
        /// Human-readable description of the failure.
        message: String,
    },
}

//! Error types for notification delivery.

use crate::network::HttpError;
use thiserror::Error;

/// Error from a single webhook delivery attempt.
///
/// The [`IsRetryable`](super::IsRetryable) impl decides which of these
/// are worth another try.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The receiver answered with a non-2xx status.
    #[error("Webhook returned status {status}")]
    NonSuccessStatus {
        /// The status code of the response.
        status: http::StatusCode,
        /// Response body, when it was valid UTF-8.
        body: Option<String>,
    },

    /// The body template failed to render.
    #[error("Payload rendering failed: {0}")]
    Template(String),
}

/// Error type for webhook notification delivery as a whole.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The retry budget ran out. Carries the last attempt's failure.
    #[error("Delivery failed after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// How many attempts were made.
        attempts: u32,
        /// What the final attempt died of.
        #[source]
        last_error: AttemptError,
    },

    /// A failure retries cannot fix ended delivery immediately.
    #[error(transparent)]
    NotRetryable(#[from] AttemptError),
}

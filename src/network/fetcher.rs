//! Address fetcher trait.

use super::{FetchError, PublicIp};

/// Trait for resolving the host's current public address.
///
/// Implementations own their retry strategy and report ordinary
/// connectivity loss as a value: once the attempt budget is spent the
/// result is [`PublicIp::NoConnection`], not an error. The error channel
/// exists for failures outside that contract, which the monitor logs
/// and swallows without touching its state.
///
/// # Example
///
/// ```ignore
/// use ipwatch::network::{AddressFetcher, FetchError, PublicIp};
/// use std::collections::VecDeque;
/// use std::sync::Mutex;
///
/// struct MockFetcher {
///     results: Mutex<VecDeque<PublicIp>>,
/// }
///
/// impl AddressFetcher for MockFetcher {
///     async fn fetch(&self) -> Result<PublicIp, FetchError> {
///         let mut results = self.results.lock().unwrap();
///         Ok(results.pop_front().unwrap_or(PublicIp::NoConnection))
///     }
/// }
/// ```
pub trait AddressFetcher: Send + Sync {
    /// Resolves the current public address.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] only for unexpected failures. Ordinary
    /// network failure resolves to `Ok(PublicIp::NoConnection)`.
    fn fetch(&self) -> impl Future<Output = Result<PublicIp, FetchError>> + Send;
}

//! Network-change source trait for platform event notifications.

use tokio_stream::Stream;

use super::SourceError;

/// Trait for platform-specific network topology change notifications.
///
/// Implementations wrap platform APIs like Windows `NotifyIpInterfaceChange`
/// to provide async event streams that signal when the network may have
/// changed. The signals carry no payload; the monitor reacts by re-checking
/// its address.
///
/// # One-time Semantics
///
/// `into_stream` consumes `self`, enforcing one-time use. Dropping the
/// stream unsubscribes.
///
/// # Stream Items
///
/// The stream yields `Result<(), SourceError>`:
/// - `Ok(())` - The topology may have changed; the caller should re-check
/// - `Err(SourceError)` - The source failed and will deliver nothing more
///
/// # Example
///
/// ```ignore
/// use ipwatch::monitor::{NetworkChangeSource, SourceError};
/// use tokio_stream::StreamExt;
///
/// async fn watch<C: NetworkChangeSource>(source: C) {
///     let mut stream = source.into_stream();
///     while let Some(event) = stream.next().await {
///         match event {
///             Ok(()) => println!("network changed"),
///             Err(e) => {
///                 eprintln!("change source failed: {e}");
///                 break;
///             }
///         }
///     }
/// }
/// ```
pub trait NetworkChangeSource: Send {
    /// The stream type returned by `into_stream`.
    type Stream: Stream<Item = Result<(), SourceError>> + Send + Unpin;

    /// Converts this source into a change-signal stream.
    ///
    /// Consumes `self` to enforce one-time semantics.
    fn into_stream(self) -> Self::Stream;
}

//! Windows network-change source using `NotifyIpInterfaceChange`.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;
use windows::Win32::Foundation::{HANDLE, NO_ERROR, WIN32_ERROR};
use windows::Win32::NetworkManagement::IpHelper::{
    CancelMibChangeNotify2, MIB_IPINTERFACE_ROW, MIB_NOTIFICATION_TYPE, NotifyIpInterfaceChange,
};
use windows::Win32::Networking::WinSock::AF_UNSPEC;

use crate::monitor::{NetworkChangeSource, SourceError};

/// Windows implementation of [`NetworkChangeSource`] over
/// `NotifyIpInterfaceChange`.
///
/// The IP Helper callback fires on a Windows thread-pool thread whenever
/// an IP interface changes; each firing becomes one `Ok(())` item on the
/// stream. Dropping the stream cancels the registration.
///
/// # Example
///
/// ```no_run
/// use ipwatch::monitor::NetworkChangeSource;
/// use ipwatch::monitor::platform::WindowsChangeSource;
/// use tokio_stream::StreamExt;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = WindowsChangeSource::new()?;
/// let mut stream = source.into_stream();
///
/// while let Some(event) = stream.next().await {
///     match event {
///         Ok(()) => println!("network topology changed"),
///         Err(e) => {
///             eprintln!("change source failed: {e}");
///             break;
///         }
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct WindowsChangeSource {
    // No configuration yet; the struct allows future extension
    _private: (),
}

impl WindowsChangeSource {
    /// Creates a Windows change source.
    ///
    /// # Errors
    ///
    /// Cannot currently fail; returns `Result` because registering with
    /// the OS happens in `into_stream` and other platforms may fail at
    /// construction.
    pub const fn new() -> Result<Self, SourceError> {
        Ok(Self { _private: () })
    }
}

impl NetworkChangeSource for WindowsChangeSource {
    type Stream = WindowsChangeStream;

    fn into_stream(self) -> Self::Stream {
        WindowsChangeStream::new()
    }
}

/// Stream of topology-change signals from the Windows IP Helper API.
pub struct WindowsChangeStream {
    receiver: mpsc::UnboundedReceiver<Result<(), SourceError>>,
    /// Cancels the notification registration on drop and reclaims the
    /// callback context.
    #[allow(dead_code)]
    handle: Option<NotificationHandle>,
    terminated: bool,
}

impl std::fmt::Debug for WindowsChangeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowsChangeStream")
            .field("terminated", &self.terminated)
            .field("has_handle", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

/// RAII wrapper for the notification handle.
struct NotificationHandle {
    handle: HANDLE,
    /// Raw pointer to reclaim the leaked `CallbackContext` after
    /// cancellation. Dropping the context drops the sender, which closes
    /// the channel.
    context_ptr: *mut CallbackContext,
}

impl Drop for NotificationHandle {
    fn drop(&mut self) {
        // SAFETY: We own this handle and it was returned by
        // NotifyIpInterfaceChange. CancelMibChangeNotify2 is safe to call
        // once per handle.
        let _ = unsafe { CancelMibChangeNotify2(self.handle) };

        // SAFETY: After CancelMibChangeNotify2 returns, Windows guarantees
        // the callback won't fire again, so the context can be reclaimed.
        drop(unsafe { Box::from_raw(self.context_ptr) });
    }
}

// SAFETY: The Windows API allows CancelMibChangeNotify2 from any thread,
// and the context pointer is only dereferenced after cancellation.
unsafe impl Send for NotificationHandle {}

/// Context handed to the Windows callback.
///
/// `UnboundedSender::send` never blocks, so posting straight from the
/// thread-pool callback onto the tokio channel is safe.
struct CallbackContext {
    sender: mpsc::UnboundedSender<Result<(), SourceError>>,
}

impl WindowsChangeStream {
    fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let (handle, terminated) = match register_notification(sender.clone()) {
            Ok((h, ctx_ptr)) => (
                Some(NotificationHandle {
                    handle: h,
                    context_ptr: ctx_ptr,
                }),
                false,
            ),
            Err(e) => {
                let _ = sender.send(Err(e));
                (None, true)
            }
        };

        Self {
            receiver,
            handle,
            terminated,
        }
    }
}

impl Stream for WindowsChangeStream {
    type Item = Result<(), SourceError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.terminated {
            return Poll::Ready(None);
        }

        match Pin::new(&mut self.receiver).poll_recv(cx) {
            Poll::Ready(Some(Ok(()))) => Poll::Ready(Some(Ok(()))),
            Poll::Ready(Some(Err(e))) => {
                self.terminated = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                // Channel closed without explicit shutdown
                self.terminated = true;
                Poll::Ready(Some(Err(SourceError::Stopped)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Registers for IP interface change notifications.
///
/// Returns the notification handle together with the context pointer so
/// the caller can reclaim the context after cancellation.
///
/// # Coverage Note
///
/// Excluded from coverage: exercising it needs real Windows API
/// interaction and actual network changes.
#[cfg(not(tarpaulin_include))]
fn register_notification(
    sender: mpsc::UnboundedSender<Result<(), SourceError>>,
) -> Result<(HANDLE, *mut CallbackContext), SourceError> {
    // Leak the context so it outlives the registration; the caller
    // reclaims it after cancellation.
    let context_ptr = Box::into_raw(Box::new(CallbackContext { sender }));
    let void_ptr = context_ptr.cast::<std::ffi::c_void>();

    let mut handle = HANDLE::default();

    // SAFETY: Callback and context stay valid for the registration's
    // lifetime. InitialNotification = false means no callback fires on
    // registration itself.
    let result = unsafe {
        NotifyIpInterfaceChange(
            AF_UNSPEC,
            Some(ip_interface_change_callback),
            Some(void_ptr),
            false, // InitialNotification
            &raw mut handle,
        )
    };

    if result != NO_ERROR {
        // SAFETY: Registration failed, so Windows won't call the callback.
        drop(unsafe { Box::from_raw(context_ptr) });
        return Err(windows::core::Error::from(WIN32_ERROR(result.0)).into());
    }

    Ok((handle, context_ptr))
}

/// Callback invoked by Windows when an IP interface changes.
///
/// # Safety
///
/// - `caller_context` must be the `CallbackContext` pointer passed at
///   registration
/// - `row` may be null and is not used
#[cfg(not(tarpaulin_include))]
unsafe extern "system" fn ip_interface_change_callback(
    caller_context: *const std::ffi::c_void,
    _row: *const MIB_IPINTERFACE_ROW,
    _notification_type: MIB_NOTIFICATION_TYPE,
) {
    if caller_context.is_null() {
        return;
    }

    // SAFETY: caller_context was set in register_notification and points
    // to a valid CallbackContext.
    let context = unsafe { &*(caller_context.cast::<CallbackContext>()) };

    // Receiver may already be gone; a failed send is fine.
    let _ = context.sender.send(Ok(()));
}

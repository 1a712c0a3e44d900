//! Platform-specific network-change sources.
//!
//! Auto mode needs an OS facility that signals "the network topology may
//! have changed". Only Windows provides one here; on other platforms the
//! run loop degrades to timed polling.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `NotifyIpInterfaceChange` via the `windows` crate.
//! - **Linux**: Planned for future (netlink).
//! - **macOS**: Planned for future (Network.framework).

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::{WindowsChangeSource, WindowsChangeStream};

// Re-export the platform's change source under one name for the run loop
#[cfg(windows)]
pub use windows::WindowsChangeSource as PlatformChangeSource;

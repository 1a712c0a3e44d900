//! Monitor layer: deciding when to check the public address and what to
//! do with the result.
//!
//! This module provides:
//! - The coordinator owning monitor state ([`MonitorCoordinator`],
//!   [`MonitorOptions`], [`CheckOutcome`])
//! - The trigger vocabulary and its notify / follow-up wiring ([`Trigger`])
//! - The restartable timer behind follow-up re-checks ([`OneShotTimer`])
//! - The change-signal seam for Auto mode ([`NetworkChangeSource`],
//!   [`platform`], [`SourceError`])

mod coordinator;
mod error;
pub mod platform;
mod source;
mod timer;
mod trigger;

#[cfg(test)]
mod coordinator_tests;
#[cfg(test)]
mod timer_tests;

pub use coordinator::{
    ADDRESS_CHANGED_TITLE, CONNECTION_LOST_TITLE, CheckOutcome, DEFAULT_FOLLOW_UP_LONG,
    DEFAULT_FOLLOW_UP_SHORT, DEFAULT_NOTIFICATION_DURATION, DEFAULT_POLL_INTERVAL,
    MonitorCoordinator, MonitorMode, MonitorOptions, NO_CONNECTION_LABEL,
};
pub use error::SourceError;
pub use source::NetworkChangeSource;
pub use timer::OneShotTimer;
pub use trigger::Trigger;

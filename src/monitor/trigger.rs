//! What caused a check, and what that check is allowed to do.

/// The event that invoked a check.
///
/// Each trigger fixes the notify / follow-up behavior of the check it
/// causes:
///
/// | Trigger          | notifies              | arms follow-ups |
/// |------------------|-----------------------|-----------------|
/// | `Startup`        | never                 | no              |
/// | `NetworkChange`  | if enabled            | yes             |
/// | `PollTick`       | if enabled            | no              |
/// | `FollowUp`       | if enabled            | no              |
///
/// The startup check only establishes the initial display state, so it
/// stays silent. Only externally signalled network changes arm the
/// follow-up re-checks; the re-checks themselves do not, which keeps a
/// flapping network from re-arming forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The initial check performed at startup.
    Startup,
    /// A network topology change signal (Auto mode).
    NetworkChange,
    /// A recurring poll timer tick (Timed mode).
    PollTick,
    /// A follow-up timer firing after a detected change.
    FollowUp,
}

impl Trigger {
    /// Short name for log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::NetworkChange => "network change",
            Self::PollTick => "poll tick",
            Self::FollowUp => "follow-up",
        }
    }

    /// Whether a change found by this check may notify.
    #[must_use]
    pub const fn should_notify(self, notifications_enabled: bool) -> bool {
        match self {
            Self::Startup => false,
            Self::NetworkChange | Self::PollTick | Self::FollowUp => notifications_enabled,
        }
    }

    /// Whether a change found by this check re-arms the follow-up timers.
    #[must_use]
    pub const fn should_follow_up(self) -> bool {
        matches!(self, Self::NetworkChange)
    }
}

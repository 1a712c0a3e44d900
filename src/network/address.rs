//! The public-address value observed by the monitor.

use std::fmt;

/// The host's externally visible address, as last resolved.
///
/// Connection loss is an ordinary value here rather than an error. The
/// sentinel compares and stores exactly like an address, which lets the
/// monitor detect "went offline" and "came back with a new address" with
/// the same equality check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicIp {
    /// The body returned by the echo endpoint, character for character.
    ///
    /// Nothing is parsed or validated at this level; IPv4, IPv6, or
    /// whatever else the endpoint answers all pass through opaquely.
    Address(String),

    /// No address could be determined.
    NoConnection,
}

impl PublicIp {
    /// Convenience constructor for an address value.
    #[must_use]
    pub fn address(value: impl Into<String>) -> Self {
        Self::Address(value.into())
    }

    /// Returns true if this value carries a concrete address.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Address(_))
    }

    /// Returns the address string, if there is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Address(addr) => Some(addr),
            Self::NoConnection => None,
        }
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => f.write_str(addr),
            Self::NoConnection => f.write_str("no connection"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_constructor_wraps_string() {
        let ip = PublicIp::address("203.0.113.5");
        assert_eq!(ip, PublicIp::Address("203.0.113.5".to_string()));
    }

    #[test]
    fn sentinel_compares_equal_to_itself() {
        assert_eq!(PublicIp::NoConnection, PublicIp::NoConnection);
        assert_ne!(PublicIp::NoConnection, PublicIp::address(""));
    }

    #[test]
    fn is_connected_distinguishes_sentinel() {
        assert!(PublicIp::address("1.2.3.4").is_connected());
        assert!(!PublicIp::NoConnection.is_connected());
    }

    #[test]
    fn as_str_exposes_only_addresses() {
        assert_eq!(PublicIp::address("1.2.3.4").as_str(), Some("1.2.3.4"));
        assert_eq!(PublicIp::NoConnection.as_str(), None);
    }

    #[test]
    fn display_renders_for_logs() {
        assert_eq!(PublicIp::address("2001:db8::1").to_string(), "2001:db8::1");
        assert_eq!(PublicIp::NoConnection.to_string(), "no connection");
    }
}

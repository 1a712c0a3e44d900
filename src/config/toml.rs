//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde. Unknown
//! keys are rejected everywhere so a typo fails loudly instead of being
//! silently ignored.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Monitoring configuration section
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Address fetch configuration section
    #[serde(default)]
    pub fetch: FetchSection,

    /// Notification behavior section
    #[serde(default)]
    pub notifications: NotificationsSection,

    /// Webhook delivery section
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Trigger mode: "auto" or "timed"
    pub mode: Option<String>,

    /// Polling interval in seconds (settle delay in auto mode)
    pub poll_interval: Option<u64>,

    /// Short follow-up re-check delay in seconds
    pub follow_up_short: Option<u64>,

    /// Long follow-up re-check delay in seconds
    pub follow_up_long: Option<u64>,
}

/// Address fetch configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchSection {
    /// Public-IP-echo endpoint URL
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,

    /// Attempts per check
    pub attempts: Option<u32>,

    /// Delay between attempts in seconds
    pub retry_delay: Option<u64>,
}

/// Notification behavior section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsSection {
    /// Whether change notifications are emitted
    pub enabled: Option<bool>,

    /// Notification display duration in seconds
    pub duration: Option<u64>,
}

/// Webhook delivery section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Webhook URL; unset disables the webhook channel
    pub url: Option<String>,

    /// HTTP method (default: POST)
    pub method: Option<String>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Bearer token for Authorization header
    pub bearer: Option<String>,

    /// Handlebars body template
    pub body_template: Option<String>,

    /// Webhook retry policy
    #[serde(default)]
    pub retry: RetrySection,
}

/// Webhook retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of delivery attempts
    pub max_attempts: Option<u32>,

    /// Initial retry delay in seconds
    pub initial_delay: Option<u64>,

    /// Maximum retry delay in seconds
    pub max_delay: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ipwatch Configuration File

[monitor]
# Trigger mode: "auto" reacts to network-change events (Windows only),
# "timed" polls on a fixed interval (default)
# mode = "timed"

# Polling interval in seconds; in auto mode this doubles as the settle
# delay before probing a just-changed network (default: 5)
poll_interval = 5

# Follow-up re-check delays after a detected change, in seconds
# follow_up_short = 5
# follow_up_long = 15

[fetch]
# Public-IP-echo endpoint (default: https://api.ipify.org)
# endpoint = "https://api.ipify.org"

# Per-request timeout in seconds (default: 10)
# timeout = 10

# Attempts per check (default: 3)
# attempts = 3

# Delay between attempts in seconds (default: 1)
# retry_delay = 1

[notifications]
# Emit a notification when the address changes or the connection is lost
enabled = true

# Notification display duration in seconds (default: 10)
# duration = 10

[webhook]
# Deliver notifications to this URL; leave unset for console-only output
# url = "https://alerts.example.com/hook"

# HTTP method (default: POST, can be overridden by --method CLI flag)
# method = "POST"

# HTTP headers
# [webhook.headers]
# X-Custom-Header = "value"

# Bearer token for Authorization header
# bearer = "your-token-here"

# Handlebars body template
# Available variables: {{title}}, {{body}}, {{duration_secs}}
# body_template = '{"text": "{{title}}: {{body}}"}'

[webhook.retry]
# Maximum number of delivery attempts (default: 3)
# max_attempts = 3

# Initial retry delay in seconds (default: 5)
# initial_delay = 5

# Maximum retry delay in seconds (default: 60)
# max_delay = 60

# Backoff multiplier (default: 2.0)
# multiplier = 2.0
"#
    .to_string()
}

//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use handlebars::Handlebars;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

use crate::monitor::{MonitorMode, MonitorOptions};
use crate::retry::RetryPolicy;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// values have been resolved against the defaults and checked.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional
/// TOML config, or [`ValidatedConfig::load`] to also read the TOML file
/// named on the command line.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Trigger mode
    pub mode: MonitorMode,

    /// Polling interval (settle delay in auto mode)
    pub poll_interval: Duration,

    /// Short follow-up re-check delay
    pub follow_up_short: Duration,

    /// Long follow-up re-check delay
    pub follow_up_long: Duration,

    /// Whether change notifications are emitted
    pub notifications_enabled: bool,

    /// Notification display duration
    pub notification_duration: Duration,

    /// Public-IP-echo endpoint
    pub endpoint: Url,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Fetch attempts per check
    pub fetch_attempts: u32,

    /// Delay between fetch attempts
    pub fetch_retry_delay: Duration,

    /// Webhook delivery settings; `None` disables the webhook channel
    pub webhook: Option<WebhookConfig>,

    /// Dry-run mode (log webhook deliveries without sending)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

/// Validated webhook delivery settings.
#[derive(Debug)]
pub struct WebhookConfig {
    /// Delivery URL
    pub url: Url,

    /// HTTP method
    pub method: Method,

    /// Headers sent with every delivery
    pub headers: HeaderMap,

    /// Handlebars body template (optional)
    pub body_template: Option<String>,

    /// Retry policy for failed deliveries
    pub retry_policy: RetryPolicy,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let webhook_str = self
            .webhook
            .as_ref()
            .map_or_else(|| "none".to_string(), |w| w.url.to_string());

        write!(
            f,
            "Config {{ mode: {}, poll_interval: {}s, follow_up: {}s/{}s, endpoint: {}, \
             fetch: {}x/{}s, notifications: {} ({}s), webhook: {}, dry_run: {} }}",
            self.mode,
            self.poll_interval.as_secs(),
            self.follow_up_short.as_secs(),
            self.follow_up_long.as_secs(),
            self.endpoint,
            self.fetch_attempts,
            self.fetch_retry_delay.as_secs(),
            if self.notifications_enabled { "on" } else { "off" },
            self.notification_duration.as_secs(),
            webhook_str,
            self.dry_run,
        )
    }
}

impl From<&ValidatedConfig> for MonitorOptions {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            mode: config.mode,
            poll_interval: config.poll_interval,
            follow_up_short: config.follow_up_short,
            follow_up_long: config.follow_up_long,
            notifications_enabled: config.notifications_enabled,
            notification_duration: config.notification_duration,
        }
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A URL is invalid
    /// - A duration is zero where that makes no sense
    /// - The mode, method, a header, or the body template fails to parse
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let mode = Self::resolve_mode(cli, toml)?;
        let poll_interval = Self::resolve_poll_interval(cli, toml)?;
        let (follow_up_short, follow_up_long) = Self::resolve_follow_ups(toml)?;
        let (notifications_enabled, notification_duration) =
            Self::resolve_notifications(cli, toml);
        let endpoint = Self::resolve_endpoint(cli, toml)?;
        let (request_timeout, fetch_attempts, fetch_retry_delay) = Self::resolve_fetch(toml)?;
        let webhook = Self::resolve_webhook(cli, toml)?;

        Ok(Self {
            mode,
            poll_interval,
            follow_up_short,
            follow_up_long,
            notifications_enabled,
            notification_duration,
            endpoint,
            request_timeout,
            fetch_attempts,
            fetch_retry_delay,
            webhook,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_mode(cli: &Cli, toml: Option<&TomlConfig>) -> Result<MonitorMode, ConfigError> {
        // CLI takes precedence
        if let Some(mode) = cli.mode {
            return Ok(mode.into());
        }

        if let Some(toml) = toml {
            if let Some(ref mode_str) = toml.monitor.mode {
                return parse_mode(mode_str);
            }
        }

        Ok(MonitorMode::Timed)
    }

    fn resolve_poll_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .poll_interval
            .or_else(|| toml.and_then(|t| t.monitor.poll_interval))
            .unwrap_or(defaults::POLL_INTERVAL_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "poll_interval",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_follow_ups(
        toml: Option<&TomlConfig>,
    ) -> Result<(Duration, Duration), ConfigError> {
        let monitor = toml.map(|t| &t.monitor);

        let short_secs = monitor
            .and_then(|m| m.follow_up_short)
            .unwrap_or(defaults::FOLLOW_UP_SHORT_SECS);
        let long_secs = monitor
            .and_then(|m| m.follow_up_long)
            .unwrap_or(defaults::FOLLOW_UP_LONG_SECS);

        for (field, secs) in [
            ("follow_up_short", short_secs),
            ("follow_up_long", long_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidDuration {
                    field,
                    reason: "must be greater than 0".to_string(),
                });
            }
        }

        Ok((
            Duration::from_secs(short_secs),
            Duration::from_secs(long_secs),
        ))
    }

    fn resolve_notifications(cli: &Cli, toml: Option<&TomlConfig>) -> (bool, Duration) {
        // The CLI flag can only disable; it never re-enables over TOML.
        let enabled = if cli.no_notifications {
            false
        } else {
            toml.and_then(|t| t.notifications.enabled)
                .unwrap_or(defaults::NOTIFICATIONS_ENABLED)
        };

        let duration_secs = toml
            .and_then(|t| t.notifications.duration)
            .unwrap_or(defaults::NOTIFICATION_DURATION_SECS);

        (enabled, Duration::from_secs(duration_secs))
    }

    fn resolve_endpoint(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .endpoint
            .as_deref()
            .or_else(|| toml.and_then(|t| t.fetch.endpoint.as_deref()))
            .unwrap_or(defaults::ENDPOINT);

        Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve_fetch(
        toml: Option<&TomlConfig>,
    ) -> Result<(Duration, u32, Duration), ConfigError> {
        let fetch = toml.map(|t| &t.fetch);

        let timeout_secs = fetch
            .and_then(|f| f.timeout)
            .unwrap_or(defaults::REQUEST_TIMEOUT_SECS);
        let attempts = fetch
            .and_then(|f| f.attempts)
            .unwrap_or(defaults::FETCH_ATTEMPTS);
        let retry_delay_secs = fetch
            .and_then(|f| f.retry_delay)
            .unwrap_or(defaults::FETCH_RETRY_DELAY_SECS);

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "fetch.timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        if attempts == 0 {
            return Err(ConfigError::InvalidFetch(
                "attempts must be greater than 0".to_string(),
            ));
        }

        if retry_delay_secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "fetch.retry_delay",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok((
            Duration::from_secs(timeout_secs),
            attempts,
            Duration::from_secs(retry_delay_secs),
        ))
    }

    fn resolve_webhook(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<WebhookConfig>, ConfigError> {
        // No URL, no webhook channel; remaining webhook settings only
        // matter once a URL names a receiver.
        let Some(url_str) = cli
            .webhook_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.url.as_deref()))
        else {
            return Ok(None);
        };

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        let method = Self::resolve_method(cli, toml)?;
        let headers = Self::resolve_headers(cli, toml)?;
        let body_template = Self::resolve_body_template(cli, toml)?;
        let retry_policy = Self::build_retry_policy(toml)?;

        Ok(Some(WebhookConfig {
            url,
            method,
            headers,
            body_template,
            retry_policy,
        }))
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // Add TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.webhook.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        // Add CLI headers (override TOML)
        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        // Handle bearer token (CLI wins, then TOML)
        let bearer = cli
            .bearer
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.bearer.as_deref()));

        if let Some(token) = bearer {
            let auth_value = format!("Bearer {token}");
            let header_value = parse_header_value("Authorization", &auth_value)?;
            headers.insert(AUTHORIZATION, header_value);
        }

        Ok(headers)
    }

    fn resolve_body_template(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<String>, ConfigError> {
        let template = cli
            .body_template
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.body_template.clone()));

        // Validate Handlebars syntax if template is provided
        if let Some(ref tmpl) = template {
            Self::validate_template(tmpl)?;
        }

        Ok(template)
    }

    fn validate_template(template: &str) -> Result<(), ConfigError> {
        let hbs = Handlebars::new();
        // Compile-check only; render with empty context to validate syntax
        hbs.render_template(template, &serde_json::json!({}))
            .map_err(|e| ConfigError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn build_retry_policy(toml: Option<&TomlConfig>) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.webhook.retry);

        let max_attempts = retry
            .and_then(|r| r.max_attempts)
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let initial_delay_secs = retry
            .and_then(|r| r.initial_delay)
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_SECS);

        let max_delay_secs = retry
            .and_then(|r| r.max_delay)
            .unwrap_or(defaults::RETRY_MAX_DELAY_SECS);

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if initial_delay_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "initial_delay must be greater than 0".to_string(),
            ));
        }

        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a positive finite number".to_string(),
            ));
        }

        if max_delay_secs < initial_delay_secs {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay ({max_delay_secs}s) must be >= initial_delay ({initial_delay_secs}s)"
            )));
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_initial_delay(Duration::from_secs(initial_delay_secs))
            .with_max_delay(Duration::from_secs(max_delay_secs))
            .with_multiplier(multiplier))
    }

    /// The fetch retry policy resolved from this configuration.
    #[must_use]
    pub const fn fetch_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.fetch_attempts, self.fetch_retry_delay)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file already exists or cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::FileExists {
            path: path.to_path_buf(),
        });
    }

    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_mode(s: &str) -> Result<MonitorMode, ConfigError> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(MonitorMode::Auto),
        "timed" => Ok(MonitorMode::Timed),
        _ => Err(ConfigError::InvalidMode {
            value: s.to_string(),
        }),
    }
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.monitor.mode.is_none());
        assert!(config.monitor.poll_interval.is_none());
        assert!(config.fetch.endpoint.is_none());
        assert!(config.notifications.enabled.is_none());
        assert!(config.webhook.url.is_none());
    }

    #[test]
    fn parse_monitor_section() {
        let toml = r#"
            [monitor]
            mode = "auto"
            poll_interval = 10
            follow_up_short = 3
            follow_up_long = 30
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.monitor.mode.as_deref(), Some("auto"));
        assert_eq!(config.monitor.poll_interval, Some(10));
        assert_eq!(config.monitor.follow_up_short, Some(3));
        assert_eq!(config.monitor.follow_up_long, Some(30));
    }

    #[test]
    fn parse_fetch_section() {
        let toml = r#"
            [fetch]
            endpoint = "https://echo.example.com"
            timeout = 5
            attempts = 5
            retry_delay = 3
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.fetch.endpoint.as_deref(),
            Some("https://echo.example.com")
        );
        assert_eq!(config.fetch.timeout, Some(5));
        assert_eq!(config.fetch.attempts, Some(5));
        assert_eq!(config.fetch.retry_delay, Some(3));
    }

    #[test]
    fn parse_notifications_section() {
        let toml = r#"
            [notifications]
            enabled = false
            duration = 20
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.notifications.enabled, Some(false));
        assert_eq!(config.notifications.duration, Some(20));
    }

    #[test]
    fn parse_full_webhook_section() {
        let toml = r#"
            [webhook]
            url = "https://alerts.example.com/hook"
            method = "PUT"
            bearer = "secret-token"
            body_template = '{"text": "{{title}}"}'

            [webhook.headers]
            X-Custom-Header = "custom-value"
            Content-Type = "application/json"

            [webhook.retry]
            max_attempts = 5
            initial_delay = 2
            max_delay = 120
            multiplier = 1.5
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let webhook = &config.webhook;

        assert_eq!(webhook.url.as_deref(), Some("https://alerts.example.com/hook"));
        assert_eq!(webhook.method.as_deref(), Some("PUT"));
        assert_eq!(webhook.bearer.as_deref(), Some("secret-token"));
        assert_eq!(
            webhook.body_template.as_deref(),
            Some(r#"{"text": "{{title}}"}"#)
        );
        assert_eq!(webhook.headers.len(), 2);
        assert_eq!(
            webhook.headers.get("X-Custom-Header").map(String::as_str),
            Some("custom-value")
        );
        assert_eq!(webhook.retry.max_attempts, Some(5));
        assert_eq!(webhook.retry.initial_delay, Some(2));
        assert_eq!(webhook.retry.max_delay, Some(120));
        assert_eq!(webhook.retry.multiplier, Some(1.5));
    }

    #[test]
    fn invalid_toml_syntax_is_an_error() {
        let result = TomlConfig::parse("this is not toml [");
        assert!(result.is_err());
    }
}

mod strictness {
    use super::*;

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let result = TomlConfig::parse("unknown_key = true");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result = TomlConfig::parse("[mystery]\nvalue = 1");
        assert!(result.is_err());
    }

    #[test]
    fn typo_in_section_key_is_rejected() {
        let toml = r#"
            [monitor]
            pol_interval = 10
        "#;
        let result = TomlConfig::parse(toml);
        assert!(result.is_err());
    }

    #[test]
    fn typo_in_webhook_retry_is_rejected() {
        let toml = r#"
            [webhook.retry]
            attempts = 3
        "#;
        let result = TomlConfig::parse(toml);
        assert!(result.is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let template = default_config_template();
        let config = TomlConfig::parse(&template).unwrap();

        // The uncommented keys carry the documented defaults.
        assert_eq!(config.monitor.poll_interval, Some(5));
        assert_eq!(config.notifications.enabled, Some(true));
        assert!(config.webhook.url.is_none());
    }

    #[test]
    fn default_template_mentions_every_section() {
        let template = default_config_template();

        assert!(template.contains("[monitor]"));
        assert!(template.contains("[fetch]"));
        assert!(template.contains("[notifications]"));
        assert!(template.contains("[webhook]"));
        assert!(template.contains("[webhook.retry]"));
    }
}

mod loading {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_reads_a_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[monitor]\npoll_interval = 42").unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.monitor.poll_interval, Some(42));
    }

    #[test]
    fn load_missing_file_is_a_read_error() {
        let result = TomlConfig::load(std::path::Path::new("/nonexistent/ipwatch.toml"));
        assert!(matches!(
            result,
            Err(super::super::ConfigError::FileRead { .. })
        ));
    }
}

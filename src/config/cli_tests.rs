//! Tests for CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use super::cli::{Cli, Command, ModeArg};

mod parsing {
    use super::*;

    #[test]
    fn parse_no_args_at_all() {
        // Everything has a default; a bare invocation is valid.
        let cli = Cli::parse_from_iter(["ipwatch"]);

        assert!(cli.command.is_none());
        assert!(cli.mode.is_none());
        assert!(cli.poll_interval.is_none());
        assert!(cli.endpoint.is_none());
        assert!(cli.webhook_url.is_none());
        assert!(!cli.no_notifications);
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_both_modes() {
        let auto = Cli::parse_from_iter(["ipwatch", "--mode", "auto"]);
        assert_eq!(auto.mode, Some(ModeArg::Auto));

        let timed = Cli::parse_from_iter(["ipwatch", "--mode", "timed"]);
        assert_eq!(timed.mode, Some(ModeArg::Timed));
    }

    #[test]
    fn parse_monitor_options() {
        let cli = Cli::parse_from_iter([
            "ipwatch",
            "--mode",
            "timed",
            "--poll-interval",
            "30",
            "--endpoint",
            "https://echo.example.com",
        ]);

        assert_eq!(cli.mode, Some(ModeArg::Timed));
        assert_eq!(cli.poll_interval, Some(30));
        assert_eq!(cli.endpoint.as_deref(), Some("https://echo.example.com"));
    }

    #[test]
    fn parse_webhook_options() {
        let cli = Cli::parse_from_iter([
            "ipwatch",
            "--webhook-url",
            "https://alerts.example.com/hook",
            "--method",
            "PUT",
            "--header",
            "X-Api-Key=secret",
            "--header",
            "Content-Type: application/json",
            "--bearer",
            "token123",
            "--body-template",
            r#"{"text":"{{title}}"}"#,
        ]);

        assert_eq!(
            cli.webhook_url.as_deref(),
            Some("https://alerts.example.com/hook")
        );
        assert_eq!(cli.method.as_deref(), Some("PUT"));
        assert_eq!(cli.headers.len(), 2);
        assert_eq!(cli.headers[0], "X-Api-Key=secret");
        assert_eq!(cli.headers[1], "Content-Type: application/json");
        assert_eq!(cli.bearer.as_deref(), Some("token123"));
        assert_eq!(
            cli.body_template.as_deref(),
            Some(r#"{"text":"{{title}}"}"#)
        );
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::parse_from_iter(["ipwatch", "--no-notifications", "--dry-run", "--verbose"]);

        assert!(cli.no_notifications);
        assert!(cli.dry_run);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_short_flags() {
        let cli = Cli::parse_from_iter(["ipwatch", "-v", "-c", "my.toml"]);

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn invalid_mode_is_rejected() {
        let result = Cli::try_parse_from(["ipwatch", "--mode", "hybrid"]);
        assert!(result.is_err());
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn init_with_default_output() {
        let cli = Cli::parse_from_iter(["ipwatch", "init"]);

        assert!(cli.is_init());
        let Some(Command::Init { output }) = cli.command else {
            panic!("expected init command");
        };
        assert_eq!(output, PathBuf::from("ipwatch.toml"));
    }

    #[test]
    fn init_with_explicit_output() {
        let cli = Cli::parse_from_iter(["ipwatch", "init", "--output", "custom.toml"]);

        let Some(Command::Init { output }) = cli.command else {
            panic!("expected init command");
        };
        assert_eq!(output, PathBuf::from("custom.toml"));
    }

    #[test]
    fn no_subcommand_is_not_init() {
        let cli = Cli::parse_from_iter(["ipwatch", "--mode", "timed"]);
        assert!(!cli.is_init());
    }
}

mod mode_conversion {
    use super::*;
    use crate::monitor::MonitorMode;

    #[test]
    fn mode_args_convert_to_monitor_modes() {
        assert_eq!(MonitorMode::from(ModeArg::Auto), MonitorMode::Auto);
        assert_eq!(MonitorMode::from(ModeArg::Timed), MonitorMode::Timed);
    }
}

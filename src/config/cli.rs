//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::monitor::MonitorMode;

/// ipwatch: public IP address monitor
///
/// Watches the host's externally visible IP address and alerts when it
/// changes or connectivity is lost.
#[derive(Debug, Parser)]
#[command(name = "ipwatch")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Trigger mode: react to network-change events or poll on a timer
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Polling interval in seconds (also the settle delay in auto mode)
    #[arg(long = "poll-interval")]
    pub poll_interval: Option<u64>,

    /// Public-IP-echo endpoint to query
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Webhook URL to deliver notifications to
    #[arg(long = "webhook-url")]
    pub webhook_url: Option<String>,

    /// HTTP method for webhook deliveries
    #[arg(long)]
    pub method: Option<String>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Bearer token for the webhook Authorization header
    #[arg(long)]
    pub bearer: Option<String>,

    /// Handlebars body template for webhook deliveries
    #[arg(long = "body-template")]
    pub body_template: Option<String>,

    /// Disable change notifications (display updates still happen)
    #[arg(long = "no-notifications")]
    pub no_notifications: bool,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Test mode - log webhook deliveries without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for ipwatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "ipwatch.toml")]
        output: PathBuf,
    },
}

/// Trigger mode argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// React to network topology change events
    #[value(name = "auto")]
    Auto,
    /// Poll on a fixed interval
    #[value(name = "timed")]
    Timed,
}

impl From<ModeArg> for MonitorMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Auto => Self::Auto,
            ModeArg::Timed => Self::Timed,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}

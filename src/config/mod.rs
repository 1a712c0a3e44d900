//! Configuration layer for ipwatch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`WebhookConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Everything has a default; a bare `ipwatch` run polls the default echo
//! endpoint every five seconds and prints to the console.
//!
//! # Boolean Flag Semantics
//!
//! `--no-notifications` and `--dry-run` only disable/enable in one
//! direction: once passed they win regardless of what the TOML says.
//!
//! # CLI-Only vs TOML-Only Options
//!
//! Some options are TOML-only (not available via CLI):
//! - The follow-up re-check delays (`monitor.follow_up_short/long`)
//! - The fetch tuning knobs (`fetch.timeout`, `fetch.attempts`,
//!   `fetch.retry_delay`)
//! - The notification duration (`notifications.duration`)
//! - The webhook retry policy (`webhook.retry.*`)
//!
//! For full configurability, use a config file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command, ModeArg};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, WebhookConfig, write_default_config};

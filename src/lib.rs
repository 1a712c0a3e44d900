//! ipwatch: Public IP address monitor
//!
//! A library for watching the machine's public IP address via an HTTP
//! echo service and surfacing changes through display and notification
//! sinks.

pub mod config;
pub mod monitor;
pub mod network;
pub mod notify;
pub mod retry;
pub mod time;

//! Network layer: public-address resolution over HTTP.
//!
//! This module provides:
//! - The address-or-sentinel value the monitor stores ([`PublicIp`])
//! - The fetch contract ([`AddressFetcher`]) and its echo-endpoint
//!   implementation ([`EchoFetcher`])
//! - A transport seam ([`HttpClient`], [`HttpRequest`], [`HttpResponse`])
//!   shared with the webhook notifier, with [`ReqwestClient`] as the
//!   production implementation

mod address;
mod client;
mod echo;
mod error;
mod fetcher;
mod http;


pub use address::PublicIp;
pub use client::ReqwestClient;
pub use echo::{DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_RETRY_DELAY, EchoFetcher};
pub use error::{FetchError, HttpError};
pub use fetcher::AddressFetcher;
pub use http::{HttpClient, HttpRequest, HttpResponse};

//! Echo-endpoint fetcher: asks a public HTTP service which address it
//! sees this host as.

use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::time::{Sleeper, TokioSleeper};

use super::{AddressFetcher, FetchError, HttpClient, HttpRequest, PublicIp};

/// Default attempt budget for a single check.
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

/// Default delay between fetch attempts.
pub const DEFAULT_FETCH_RETRY_DELAY: Duration = Duration::from_secs(1);

/// [`AddressFetcher`] over a public-IP-echo endpoint.
///
/// Each check issues up to `max_attempts` GET requests to the endpoint.
/// Outcome classification, per attempt:
///
/// - **4xx status**: the endpoint understood the request and refused it.
///   Retrying cannot help, so the check resolves to
///   [`PublicIp::NoConnection`] immediately.
/// - **any other status** (2xx, 3xx, 5xx alike): the response body passes
///   through untouched as [`PublicIp::Address`].
/// - **transport failure** (DNS, connect, timeout): retried after a fixed
///   delay until the budget runs out, then [`PublicIp::NoConnection`].
///
/// # Type Parameters
///
/// - `H`: the HTTP client implementation
/// - `S`: the sleeper used for inter-attempt delays (defaults to
///   [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use ipwatch::network::{AddressFetcher, EchoFetcher, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = Url::parse("https://api.ipify.org")?;
/// let fetcher = EchoFetcher::new(ReqwestClient::new(), endpoint);
/// let address = fetcher.fetch().await?;
/// println!("public address: {address}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EchoFetcher<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    endpoint: url::Url,
    retry: RetryPolicy,
}

impl<H: HttpClient> EchoFetcher<H> {
    /// Creates a fetcher with the default attempt budget and delay.
    pub fn new(client: H, endpoint: url::Url) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            endpoint,
            retry: RetryPolicy::fixed(DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_RETRY_DELAY),
        }
    }
}

impl<H: HttpClient, S: Sleeper> EchoFetcher<H, S> {
    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Replaces the sleeper used between attempts.
    #[must_use]
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> EchoFetcher<H, S2> {
        EchoFetcher {
            client: self.client,
            sleeper,
            endpoint: self.endpoint,
            retry: self.retry,
        }
    }

    /// The endpoint this fetcher queries.
    #[must_use]
    pub const fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

impl<H: HttpClient, S: Sleeper> AddressFetcher for EchoFetcher<H, S> {
    async fn fetch(&self) -> Result<PublicIp, FetchError> {
        for attempt in 1..=self.retry.max_attempts {
            match self.client.request(HttpRequest::get(self.endpoint.clone())).await {
                Ok(response) if response.is_client_error() => {
                    tracing::error!(
                        "Echo endpoint rejected the request with status {}",
                        response.status
                    );
                    return Ok(PublicIp::NoConnection);
                }
                Ok(response) => {
                    // Anything that is not a client error passes its body
                    // through, successful or not.
                    let body = String::from_utf8_lossy(&response.body).into_owned();
                    tracing::debug!("Echo endpoint answered with status {}", response.status);
                    return Ok(PublicIp::Address(body));
                }
                Err(e) => {
                    tracing::warn!(
                        "Address fetch attempt {attempt}/{} failed: {e}",
                        self.retry.max_attempts
                    );
                }
            }

            if self.retry.should_retry(attempt) {
                self.sleeper
                    .sleep(self.retry.delay_for_retry(attempt - 1))
                    .await;
            }
        }

        tracing::error!("All fetch attempts failed, reporting no connection");
        Ok(PublicIp::NoConnection)
    }
}

//! Webhook notification channel.

use std::time::Duration;

use handlebars::Handlebars;
use serde::Serialize;

use crate::network::{HttpClient, HttpError, HttpRequest};
use crate::retry::RetryPolicy;
use crate::time::{Sleeper, TokioSleeper};

use super::{AttemptError, NotifyError, PresentationSink};

/// Delivers notifications to an HTTP endpoint, with retries.
///
/// Persistent display text has no meaning for a transient alert channel,
/// so `set_display_text` is a no-op here; only notifications go out. Per
/// the [`PresentationSink`] contract, delivery failures are logged and
/// swallowed.
///
/// # Payload
///
/// Without a template the payload is a JSON object with `title`, `body`,
/// and `duration_secs` fields, sent as `application/json` unless the
/// configured headers already name a content type. With a Handlebars
/// template, the rendered text is sent verbatim; the same three variables
/// are available:
///
/// - `{{title}}`: the notification title
/// - `{{body}}`: the notification body
/// - `{{duration_secs}}`: the display duration in whole seconds
///
/// # Type Parameters
///
/// - `H`: the HTTP client implementation
/// - `S`: the sleeper used for retry delays (defaults to [`TokioSleeper`])
#[derive(Debug, Clone)]
pub struct WebhookSink<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    url: url::Url,
    method: http::Method,
    headers: http::HeaderMap,
    body_template: Option<String>,
    retry_policy: RetryPolicy,
    dry_run: bool,
}

impl<H: HttpClient> WebhookSink<H> {
    /// Creates a webhook sink posting to `url` with backoff defaults.
    pub fn new(client: H, url: url::Url) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            url,
            method: http::Method::POST,
            headers: http::HeaderMap::new(),
            body_template: None,
            retry_policy: RetryPolicy::new(),
            dry_run: false,
        }
    }
}

impl<H: HttpClient, S: Sleeper> WebhookSink<H, S> {
    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: http::Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the headers sent with every delivery.
    #[must_use]
    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets a Handlebars template for the payload.
    #[must_use]
    pub fn with_body_template(mut self, template: impl Into<String>) -> Self {
        self.body_template = Some(template.into());
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Replaces the sleeper used between retries.
    #[must_use]
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> WebhookSink<H, S2> {
        WebhookSink {
            client: self.client,
            sleeper,
            url: self.url,
            method: self.method,
            headers: self.headers,
            body_template: self.body_template,
            retry_policy: self.retry_policy,
            dry_run: self.dry_run,
        }
    }

    /// When set, deliveries are logged instead of sent.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The delivery URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// The delivery method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// The configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

/// Variables exposed to payload rendering.
#[derive(Serialize)]
struct NotificationData<'a> {
    title: &'a str,
    body: &'a str,
    duration_secs: u64,
}

impl<H: HttpClient, S: Sleeper> WebhookSink<H, S> {
    /// Renders the payload, templated or default JSON.
    fn render_payload(&self, data: &NotificationData<'_>) -> Result<Vec<u8>, AttemptError> {
        if let Some(template) = &self.body_template {
            let handlebars = Handlebars::new();
            let rendered = handlebars
                .render_template(template, data)
                .map_err(|e| AttemptError::Template(e.to_string()))?;
            return Ok(rendered.into_bytes());
        }

        serde_json::to_vec(data).map_err(|e| AttemptError::Template(e.to_string()))
    }

    /// Builds the HTTP request for one notification.
    fn build_request(&self, data: &NotificationData<'_>) -> Result<HttpRequest, AttemptError> {
        let mut request = HttpRequest::new(self.method.clone(), self.url.clone());

        for (name, value) in &self.headers {
            request.headers.append(name, value.clone());
        }

        // The default payload is JSON; say so unless the operator already did.
        if self.body_template.is_none()
            && !request.headers.contains_key(http::header::CONTENT_TYPE)
        {
            request.headers.insert(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            );
        }

        request.body = Some(self.render_payload(data)?);
        Ok(request)
    }

    /// Executes a single delivery attempt.
    async fn execute_request(&self, request: &HttpRequest) -> Result<(), AttemptError> {
        let response = self.client.request(request.clone()).await?;

        if response.is_success() {
            return Ok(());
        }

        Err(AttemptError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }

    /// Delivers with retry.
    async fn send_with_retry(&self, data: &NotificationData<'_>) -> Result<(), NotifyError> {
        let request = self.build_request(data)?;

        let mut last_error: Option<AttemptError> = None;

        for attempt in 1..=self.retry_policy.max_attempts {
            match self.execute_request(&request).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    // Non-retryable errors fail immediately
                    if !e.is_retryable() {
                        return Err(e.into());
                    }

                    tracing::warn!(
                        "Webhook attempt {attempt}/{} failed: {e}",
                        self.retry_policy.max_attempts
                    );
                    last_error = Some(e);

                    // Don't sleep after the last attempt
                    if self.retry_policy.should_retry(attempt) {
                        let delay = self.retry_policy.delay_for_retry(attempt - 1);
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        Err(NotifyError::MaxRetriesExceeded {
            attempts: self.retry_policy.max_attempts,
            last_error: last_error.expect("max_attempts >= 1 ensures at least one attempt"),
        })
    }
}

impl<H: HttpClient, S: Sleeper> PresentationSink for WebhookSink<H, S> {
    async fn set_display_text(&self, _text: &str) {}

    async fn show_notification(&self, title: &str, body: &str, duration: Duration) {
        let data = NotificationData {
            title,
            body,
            duration_secs: duration.as_secs(),
        };

        if self.dry_run {
            tracing::info!("Dry-run: webhook notification '{title}' not sent");
            return;
        }

        match self.send_with_retry(&data).await {
            Ok(()) => tracing::debug!("Webhook notification delivered: {title}"),
            Err(e) => tracing::error!("Webhook notification failed: {e}"),
        }
    }
}

/// Extension trait for classifying attempt failures.
///
/// Decides whether an error is plausibly transient. [`WebhookSink`] keeps
/// retrying only while this says yes.
pub trait IsRetryable {
    /// Returns true if the error is worth another attempt.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            Self::Connection(_) | Self::Timeout => true,
            // URL errors are configuration issues, not transient
            Self::InvalidUrl(_) => false,
        }
    }
}

impl IsRetryable for AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_retryable(),
            // Server errors (5xx) are typically transient.
            // Rate limiting (429) and request timeout (408) also warrant
            // another try; remaining 4xx means the request itself is wrong.
            Self::NonSuccessStatus { status, .. } => {
                status.is_server_error()
                    || *status == http::StatusCode::TOO_MANY_REQUESTS
                    || *status == http::StatusCode::REQUEST_TIMEOUT
            }
            // Template errors are configuration issues
            Self::Template(_) => false,
        }
    }
}

//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests for index and article pages
//! - Bounded retry with capped exponential backoff for transient failures
//! - Error classification

use crate::config::{HttpConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the per-request timeout
        timed_out: bool,
    },
}

impl FetchResult {
    /// Short description of a failed fetch for logs and errors
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error, .. } => Some(error.clone()),
        }
    }
}

/// Retry schedule for transient failures
///
/// Delays start at `base_delay` and double per retry, capped at `max_delay`
/// and jittered. `max_retries = 0` performs a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_ms),
            max_delay: Duration::from_millis(config.retry_max_ms),
        }
    }

    /// Delays between attempts
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        // from_millis(2) doubles each step; the factor scales the first step to base_delay
        let factor = (self.base_delay.as_millis() as u64 / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.max_retries)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `http` - Timeouts for every request
///
/// # Example
///
/// ```no_run
/// use wiki_corpus::config::{HttpConfig, UserAgentConfig};
/// use wiki_corpus::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(http.timeout())
        .connect_timeout(http.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with the configured retry policy
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

/// Failure of a single attempt
#[derive(Debug)]
enum AttemptError {
    Status(StatusCode),
    Transport(reqwest::Error),
}

impl AttemptError {
    /// Server errors, throttling, timeouts and connection failures may
    /// succeed on a later attempt; other statuses will not
    fn is_transient(&self) -> bool {
        match self {
            Self::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        }
    }
}

struct Page {
    final_url: String,
    status_code: u16,
    body: String,
}

impl Fetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Builds a fetcher from the HTTP and user-agent configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        http: &HttpConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, http)?;
        Ok(Self::new(client, RetryPolicy::from_config(http)))
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Success |
    /// | HTTP 5xx, 429 | Retry per policy, then HttpError |
    /// | Other non-2xx | Immediate HttpError |
    /// | Timeout, connect failure | Retry per policy, then NetworkError |
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let fetcher = self;
        let outcome = RetryIf::spawn(
            self.retry.delays(),
            move || fetcher.attempt(url),
            |e: &AttemptError| {
                let transient = e.is_transient();
                if transient {
                    tracing::debug!("Transient failure for {}: {:?}", url, e);
                }
                transient
            },
        )
        .await;

        match outcome {
            Ok(page) => FetchResult::Success {
                final_url: page.final_url,
                status_code: page.status_code,
                body: page.body,
            },
            Err(AttemptError::Status(status)) => FetchResult::HttpError {
                status_code: status.as_u16(),
            },
            Err(AttemptError::Transport(e)) => {
                let timed_out = e.is_timeout();
                let error = if timed_out {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    e.to_string()
                };
                FetchResult::NetworkError { error, timed_out }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<Page, AttemptError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(AttemptError::Transport)?;

        Ok(Page {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}

//! HTTP transport with retry on transient failures.
//!
//! The client hands every prepared request to a [`Transport`]. Retries
//! happen here and nowhere else; once the policy is exhausted the last
//! response is returned as-is so that status handling stays with the
//! caller.

use std::time::Duration;

use reqwest::{Client, Request, Response, StatusCode};

/// When and how long to wait before resending a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Send each request once.
    None,

    /// Wait `initial_delay * 2^(attempt - 1)`, capped at `max_delay`.
    ExponentialBackoff {
        /// Delay before the first retry.
        initial_delay: Duration,
        /// Upper bound for any single delay.
        max_delay: Duration,
        /// Maximum number of retries.
        max_retries: usize,
    },

    /// Wait a fixed delay between attempts.
    Linear {
        /// Delay between attempts.
        delay: Duration,
        /// Maximum number of retries.
        max_retries: usize,
    },
}

impl Default for RetryPolicy {
    /// Four retries, backing off from one second up to thirty.
    fn default() -> Self {
        Self::ExponentialBackoff {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: 4,
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry (1-indexed), or `None` once exhausted.
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_retries,
            } => {
                if attempt == 0 || attempt > *max_retries {
                    return None;
                }
                let multiplier = 2u32.saturating_pow((attempt - 1) as u32);
                Some(initial_delay.saturating_mul(multiplier).min(*max_delay))
            }
            Self::Linear { delay, max_retries } => {
                if attempt == 0 || attempt > *max_retries {
                    None
                } else {
                    Some(*delay)
                }
            }
        }
    }

    /// Maximum number of retries.
    pub fn max_retries(&self) -> usize {
        match self {
            Self::None => 0,
            Self::ExponentialBackoff { max_retries, .. } | Self::Linear { max_retries, .. } => {
                *max_retries
            }
        }
    }
}

/// Whether a response status is worth retrying.
///
/// Rate limiting and server errors are, except `501 Not Implemented`.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Sends prepared requests, retrying transient failures.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    retry: RetryPolicy,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Transport {
    /// Wrap an HTTP client, using the default retry policy.
    pub fn new(http: Client) -> Self {
        Self {
            http,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The wrapped HTTP client.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// The active retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send a request, retrying per the policy.
    ///
    /// Requests with a streaming body cannot be cloned and are sent once.
    pub async fn send(&self, request: Request) -> reqwest::Result<Response> {
        let mut request = request;
        let mut attempt = 0;

        loop {
            let retry = self
                .retry
                .delay_for_attempt(attempt + 1)
                .and_then(|delay| request.try_clone().map(|copy| (delay, copy)));

            let method = request.method().clone();
            let url = request.url().clone();
            let outcome = self.http.execute(request).await;

            let Some((delay, next)) = retry else {
                return outcome;
            };

            let reason = match &outcome {
                Ok(response) if is_retryable_status(response.status()) => {
                    Some(format!("status {}", response.status().as_u16()))
                }
                Err(e) if is_retryable_error(e) => Some(e.to_string()),
                _ => None,
            };
            let Some(reason) = reason else {
                return outcome;
            };

            attempt += 1;
            tracing::warn!(
                %method,
                %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                reason = %reason,
                "Retrying request"
            );
            drop(outcome);
            tokio::time::sleep(delay).await;
            request = next;
        }
    }
}

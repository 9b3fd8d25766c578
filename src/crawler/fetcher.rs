//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the shared HTTP client with a static user agent and timeout
//! - GET requests decoded as JSON
//! - Bounded retries with exponential backoff for transient failures
//! - Error classification
//!
//! Callers only ever see `Option<Value>` through [`JsonSource`]; a failed
//! request is logged here and surfaces as `None`.

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for any single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Statuses worth retrying; everything else fails on the first response
const RETRYABLE_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Why a single fetch gave up
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a GET with a JSON document
///
/// The collection loop only depends on this trait, so tests can drive it with
/// canned payloads instead of a network.
#[allow(async_fn_in_trait)]
pub trait JsonSource {
    /// Fetches `url` and decodes it as JSON, or `None` on any failure
    async fn fetch_json(&self, url: &str) -> Option<Value>;
}

/// Retry schedule for transient failures
///
/// Only idempotent GET requests are issued, so every request is eligible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    /// Base of the exponential backoff, in seconds
    pub backoff_factor: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            retries: config.retries,
            backoff_factor: config.backoff_factor,
        }
    }

    /// Sleep before the `retry`-th retry (1-based)
    ///
    /// The first retry is immediate; later ones wait `factor * 2^(retry-1)`.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exponent = retry.saturating_sub(1).min(31) as i32;
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        if !seconds.is_finite() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(seconds).min(MAX_BACKOFF)
    }

    pub fn is_retryable_status(status: StatusCode) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }
}

/// Builds the shared HTTP client
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// JSON fetcher over a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetches a URL and decodes the body as JSON, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 429, 500, 502, 503, 504 | Retry with backoff |
    /// | Timeout / connection error | Retry with backoff |
    /// | Other non-2xx status | Immediate failure |
    /// | Body is not JSON | Immediate failure |
    ///
    /// A numeric `Retry-After` header on a retryable response replaces the
    /// computed backoff.
    pub async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut retry = 0;

        loop {
            let (error, retry_after) = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.bytes().await?;
                        return Ok(serde_json::from_slice(&body)?);
                    }

                    if !RetryPolicy::is_retryable_status(status) {
                        return Err(FetchError::Status {
                            status: status.as_u16(),
                        });
                    }

                    let retry_after = parse_retry_after(response.headers());
                    let error = FetchError::Status {
                        status: status.as_u16(),
                    };
                    (error, retry_after)
                }
                Err(e) if RetryPolicy::is_retryable_error(&e) => (FetchError::Transport(e), None),
                Err(e) => return Err(FetchError::Transport(e)),
            };

            if retry >= self.retry.retries {
                return Err(error);
            }
            retry += 1;

            let delay = retry_after
                .unwrap_or_else(|| self.retry.backoff(retry))
                .min(MAX_BACKOFF);
            tracing::debug!(
                "Retry {}/{} for {} in {:?} after {}",
                retry,
                self.retry.retries,
                url,
                delay,
                error
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl JsonSource for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        match self.get_json(url).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Failed request {}: {}", url, e);
                None
            }
        }
    }
}

/// Reads a `Retry-After` header given in seconds
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}

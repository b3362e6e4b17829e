//! HTTP fetcher
//!
//! One page retrieval per call, bounded by the configured timeout, with every
//! outcome classified so the engine can keep crawling through failures:
//!
//! | Condition                  | Classification | Retried |
//! |----------------------------|----------------|---------|
//! | HTTP status outside 2xx    | `Status`       | never   |
//! | Request or body timeout    | `Timeout`      | bounded |
//! | Connection/TLS/DNS failure | `Transport`    | bounded |
//! | Body decode failure        | `Decode`       | never   |
//!
//! Redirects are followed by the HTTP client itself; the final URL after
//! redirects is reported alongside the body.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base backoff between retries; grows linearly with the attempt number
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Decoded page body
    pub body: String,
}

/// Classified fetch failure
///
/// Not a programming error: every variant is an expected network outcome
/// that the engine logs and moves past.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("body decode failure: {0}")]
    Decode(String),
}

impl FetchFailure {
    /// Transient failures are eligible for retry; status and decode
    /// failures are deterministic and never retried
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_))
    }
}

/// Builds the shared HTTP client with proper identification and timeouts
///
/// # Example
///
/// ```no_run
/// use papyrus::config::UserAgentConfig;
/// use papyrus::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "Papyrus".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
/// };
///
/// let client = build_http_client(&config, 15).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single URL, classifying every failure
///
/// Exactly one network request (plus whatever redirects the client follows).
/// Never panics and never returns an unclassified error.
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchedPage, FetchFailure> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return Err(classify_request_error(e)),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(FetchFailure::Status(status.as_u16()));
    }

    match response.text().await {
        Ok(body) => Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        }),
        Err(e) if e.is_timeout() => Err(FetchFailure::Timeout),
        Err(e) => Err(FetchFailure::Decode(e.to_string())),
    }
}

/// Fetches a URL, retrying transient failures up to `max_retries` times
///
/// Backoff is linear: 500ms after the first failure, 1s after the second,
/// and so on. Non-transient failures are returned immediately.
pub async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    max_retries: u32,
) -> Result<FetchedPage, FetchFailure> {
    let mut attempt = 0;
    loop {
        match fetch_url(client, url).await {
            Ok(page) => return Ok(page),
            Err(failure) if failure.is_transient() && attempt < max_retries => {
                attempt += 1;
                let backoff = RETRY_BACKOFF * attempt;
                tracing::debug!(
                    "Transient failure for {} ({}), retry {}/{} in {:?}",
                    url,
                    failure,
                    attempt,
                    max_retries,
                    backoff
                );
                tokio::time::sleep(backoff).await;
            }
            Err(failure) => return Err(failure),
        }
    }
}

/// Maps a reqwest send error onto the failure taxonomy
fn classify_request_error(e: reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Transport(format!("connection failed: {}", e))
    } else {
        FetchFailure::Transport(e.to_string())
    }
}

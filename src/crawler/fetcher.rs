//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch listing pages
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::SweepError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Result of a single fetch attempt
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Server answered with a 2xx status and the body was read completely
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, truncated body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    fn describe(&self) -> String {
        match self {
            Self::Success { status_code, .. } => format!("HTTP {}", status_code),
            Self::HttpError { status_code } => format!("HTTP {}", status_code),
            Self::NetworkError { error } => error.clone(),
        }
    }
}

/// Anything that can perform one fetch of a listing page
///
/// The HTTP implementation is [`HttpSource`]; tests substitute synthetic
/// sources to control latency and failures per page.
pub trait PageSource: Send + Sync {
    /// Performs exactly one request for `url`, with no retry
    fn fetch(&self, url: &Url) -> impl Future<Output = FetchResult> + Send;
}

/// [`PageSource`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Builds a source with a fresh client configured from `config`
    pub fn new(user_agent: &UserAgentConfig, scraper: &ScraperConfig) -> Result<Self, SweepError> {
        Ok(Self {
            client: build_http_client(user_agent, scraper)?,
        })
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &Url) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use forum_sweep::config::{ScraperConfig, UserAgentConfig};
/// use forum_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    scraper: &ScraperConfig,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version
    let agent = format!("{}/{}", user_agent.name, user_agent.version);

    Client::builder()
        .user_agent(agent)
        .timeout(Duration::from_secs(scraper.request_timeout_secs))
        .connect_timeout(Duration::from_secs(scraper.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the outcome
///
/// The response body is read to the end before returning, so the connection
/// is released on every path.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    tracing::debug!("Requesting {}", url);

    match client.get(url.clone()).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: format!("Failed to read body: {}", e),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Fetches a page body, retrying failed attempts immediately
///
/// Up to `max_retries` extra attempts follow the first one. Network errors,
/// unreadable bodies and non-2xx statuses all consume one attempt. There is
/// no delay between attempts.
///
/// # Returns
///
/// * `Ok(String)` - Body of the first successful attempt
/// * `Err(SweepError::Fetch)` - Every attempt failed
pub async fn fetch_with_retry<S: PageSource>(
    source: &S,
    url: &Url,
    max_retries: u32,
) -> Result<String, SweepError> {
    let mut attempts = 0;

    loop {
        attempts += 1;
        let outcome = source.fetch(url).await;

        if let FetchResult::Success { body, .. } = outcome {
            return Ok(body);
        }

        if attempts > max_retries {
            return Err(SweepError::Fetch {
                url: url.to_string(),
                attempts,
                message: outcome.describe(),
            });
        }

        tracing::debug!(
            "Attempt {} for {} failed ({}), retrying",
            attempts,
            url,
            outcome.describe()
        );
    }
}

/// Fetches a page exactly once, turning every failure into an error
///
/// Used for the first page of a search, where a failure is fatal.
pub async fn fetch_once<S: PageSource>(source: &S, url: &Url) -> Result<String, SweepError> {
    match source.fetch(url).await {
        FetchResult::Success { body, .. } => Ok(body),
        FetchResult::HttpError { status_code } => Err(SweepError::Status {
            url: url.to_string(),
            status: status_code,
        }),
        FetchResult::NetworkError { error } => Err(SweepError::Fetch {
            url: url.to_string(),
            attempts: 1,
            message: error,
        }),
    }
}

//! HTTP fetcher implementation
//!
//! This module handles all plain HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - The global in-flight request limit
//! - Per-domain download delay
//! - Retry logic for transient failures
//!
//! Redirects are followed by the client; the final URL is reported back so
//! relative links resolve against the page that was actually served.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::throttle::DomainThrottle;
use crate::url::extract_authority;
use crate::CrawlerError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Pause between attempts at a transiently failing URL
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Page body decoded as text
    pub body: String,
}

/// Source of static HTML for entry and collection pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlerError>;
}

/// Builds an HTTP client with proper configuration
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by reqwest
pub struct HttpFetcher {
    client: Client,
    permits: Arc<Semaphore>,
    throttle: DomainThrottle,
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, CrawlerError> {
        let client = build_http_client(crawler, user_agent).map_err(CrawlerError::HttpClient)?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(crawler.max_concurrent_requests as usize)),
            throttle: DomainThrottle::new(Duration::from_millis(crawler.download_delay_ms)),
            max_retries: crawler.max_retries,
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedPage, Attempt> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(Attempt::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Attempt::from_status(status));
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(Attempt::from_transport)?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

/// Outcome of a single failed attempt
enum Attempt {
    Retryable(Failure),
    Fatal(Failure),
}

enum Failure {
    Transport(reqwest::Error),
    Status(u16),
}

impl Attempt {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::Retryable(Failure::Transport(error))
        } else {
            Self::Fatal(Failure::Transport(error))
        }
    }

    fn from_status(status: StatusCode) -> Self {
        let retryable = status.is_server_error()
            || status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS;

        if retryable {
            Self::Retryable(Failure::Status(status.as_u16()))
        } else {
            Self::Fatal(Failure::Status(status.as_u16()))
        }
    }
}

impl Failure {
    fn into_error(self, url: &Url) -> CrawlerError {
        match self {
            Self::Transport(source) => CrawlerError::Http {
                url: url.to_string(),
                source,
            },
            Self::Status(status) => CrawlerError::HttpStatus {
                url: url.to_string(),
                status,
            },
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlerError> {
        let domain = extract_authority(url).unwrap_or_default();
        let mut attempt = 0;

        loop {
            self.throttle.acquire(&domain).await;

            let result = {
                // The semaphore is never closed, so acquire cannot fail here
                let _permit = self.permits.acquire().await;
                tracing::debug!("GET {}", url);
                self.fetch_once(url).await
            };

            match result {
                Ok(page) => return Ok(page),
                Err(Attempt::Retryable(failure)) if attempt < self.max_retries => {
                    attempt += 1;
                    let error = failure.into_error(url);
                    tracing::warn!(
                        "Retrying {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.max_retries,
                        error
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(Attempt::Retryable(failure)) | Err(Attempt::Fatal(failure)) => {
                    return Err(failure.into_error(url));
                }
            }
        }
    }
}

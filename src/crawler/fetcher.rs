//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Following redirects so the final URL can be compared with the request
//! - Retrying failed attempts with a fixed delay

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Page body
    pub html: String,

    /// URL that actually served the body, after redirects
    pub final_url: String,

    /// HTTP status code of the final response
    pub status: u16,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use product_crawler::config::Config;
/// use product_crawler::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.user_agent())
        .timeout(crawler.request_timeout())
        .connect_timeout(crawler.connect_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with a fixed retry budget
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retries: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher making at most `retries` attempts per URL
    pub fn new(client: Client, retries: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            retries: retries.max(1),
            retry_delay,
        }
    }

    /// Builds the client and retry policy from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        Ok(Self::new(
            client,
            config.crawler.retries,
            config.crawler.retry_delay(),
        ))
    }

    /// Makes a single GET attempt
    ///
    /// Any non-2xx final status is an error, as are network failures and
    /// unreadable bodies.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            html,
            final_url,
            status: status.as_u16(),
        })
    }

    /// Fetches a URL, retrying failed attempts
    ///
    /// Sleeps `retry_delay` between attempts. Returns `None` once every
    /// attempt has failed; one unreachable page never aborts the crawl.
    pub async fn fetch_with_retry(&self, url: &str) -> Option<FetchedPage> {
        for attempt in 1..=self.retries {
            tracing::info!("Visiting url: {} (attempt {}/{})", url, attempt, self.retries);

            match self.fetch(url).await {
                Ok(page) => return Some(page),
                Err(e) => {
                    tracing::warn!("Attempt {}/{} failed: {}", attempt, self.retries, e);
                    if attempt < self.retries {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        tracing::warn!("Giving up on {} after {} attempts", url, self.retries);
        None
    }
}

/// Maps a reqwest error to a fetch error
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

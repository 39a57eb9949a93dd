use serde::Deserialize;
use std::time::Duration;

/// Site crawled when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "http://www.epocacosmeticos.com.br";

/// Path suffix that marks a product page
pub const DEFAULT_PRODUCT_SUFFIX: &str = "/p";

/// Maximum number of URLs dispatched in one batch
pub const DEFAULT_BATCH_CAPACITY: usize = 800;

/// Attempts per page before it is given up
pub const DEFAULT_RETRIES: u32 = 3;

/// Fixed delay between attempts (milliseconds)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing keys fall back to
/// the defaults above.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// The single site being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme, host and optional port of the site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path suffix of product page URLs
    #[serde(rename = "product-suffix")]
    pub product_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            product_suffix: DEFAULT_PRODUCT_SUFFIX.to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of URLs taken from the horizon per round
    #[serde(rename = "batch-capacity")]
    pub batch_capacity: usize,

    /// Concurrent page fetches; 0 picks four per available core
    pub workers: usize,

    /// Attempts per page, including the first one
    pub retries: u32,

    /// Delay between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            workers: 0,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl CrawlerConfig {
    /// Size of the worker pool used for each batch
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }

        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            * 4
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value as `Name/Version`
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

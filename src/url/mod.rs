//! URL handling for the crawled site
//!
//! The crawler is confined to a single origin. [`SiteScope`] resolves the
//! seed given on the command line and decides which links found on a page
//! belong to the site.

mod domain;

use crate::ConfigError;
use url::Url;

pub use domain::{extract_domain, same_origin};

/// The origin being crawled
#[derive(Debug, Clone)]
pub struct SiteScope {
    base: Url,
}

impl SiteScope {
    /// Creates a scope from the configured base URL
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidUrl` if the base URL does not parse or is not an
    /// http(s) URL with a host.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", base_url, e)))?;

        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}' is not an http(s) site",
                base_url
            )));
        }

        Ok(Self { base })
    }

    /// Returns true if the URL is on this site
    pub fn contains(&self, url: &Url) -> bool {
        same_origin(&self.base, url)
    }

    /// Resolves the crawl starting point
    ///
    /// A root-relative path is joined to the base URL; an absolute URL is
    /// accepted only when it is on the site. Anything else is a fatal
    /// configuration error, reported before any page is fetched.
    ///
    /// # Examples
    ///
    /// ```
    /// use product_crawler::url::SiteScope;
    ///
    /// let scope = SiteScope::new("http://www.example.com").unwrap();
    /// let seed = scope.resolve_seed("/perfumes/p").unwrap();
    /// assert_eq!(seed.as_str(), "http://www.example.com/perfumes/p");
    /// assert!(scope.resolve_seed("invalid_url!").is_err());
    /// ```
    pub fn resolve_seed(&self, start: &str) -> Result<Url, ConfigError> {
        let start = start.trim();

        let url = if start.starts_with('/') {
            self.base
                .join(start)
                .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", start, e)))?
        } else {
            Url::parse(start).map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", start, e)))?
        };

        if !self.contains(&url) {
            return Err(ConfigError::OffSite {
                url: url.to_string(),
                site: self.base.to_string(),
            });
        }

        Ok(url)
    }

    /// Resolves an `href` found on a page to an absolute on-site URL
    ///
    /// Only root-relative paths and absolute same-origin URLs are kept.
    /// Page-relative paths, fragments and non-HTTP schemes are dropped.
    pub fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();

        let url = if href.starts_with('/') {
            self.base.join(href).ok()?
        } else if href.starts_with("http://") || href.starts_with("https://") {
            Url::parse(href).ok()?
        } else {
            return None;
        };

        if self.contains(&url) {
            Some(url.to_string())
        } else {
            None
        }
    }
}

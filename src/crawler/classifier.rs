//! Product page classification

use crate::CrawlError;
use url::Url;

/// Decides whether a fetched page is a product page
///
/// A page is a product page only when the requested URL ends with the
/// product suffix **and** the server answered from that same URL. Removed
/// products redirect to a search or home page whose markup can look like a
/// product page, so a redirect always disqualifies the request.
///
/// # Errors
///
/// `CrawlError::InvalidInput` if `requested` is empty or not an absolute
/// URL. Callers treat this as a contract violation, not a transient error.
///
/// # Example
///
/// ```
/// use product_crawler::crawler::is_product_page;
///
/// let url = "http://shop.test/fake-product/p";
/// assert!(is_product_page(url, url, "/p").unwrap());
/// assert!(!is_product_page(url, "http://shop.test/?ProductLinkNotFound=fake-product/p", "/p").unwrap());
/// ```
pub fn is_product_page(
    requested: &str,
    final_url: &str,
    product_suffix: &str,
) -> Result<bool, CrawlError> {
    if requested.is_empty() {
        return Err(CrawlError::InvalidInput(
            "requested URL is empty".to_string(),
        ));
    }

    Url::parse(requested).map_err(|e| {
        CrawlError::InvalidInput(format!("requested URL '{}' is not absolute: {}", requested, e))
    })?;

    Ok(requested.ends_with(product_suffix) && final_url == requested)
}

//! HTML parser for extracting product fields and links
//!
//! This module handles parsing HTML content to extract:
//! - The product name (first `.productName` element)
//! - The page title (`<head><title>`)
//! - Links that stay on the crawled site

use crate::url::SiteScope;
use crate::ExtractionError;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

const PRODUCT_NAME_SELECTOR: &str = ".productName";
const TITLE_SELECTOR: &str = "head > title";

/// Fields extracted from a product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub product_name: String,
    pub page_title: String,
}

/// Extracts the product name and page title from a product page
///
/// The product name may span several lines in the markup; each line is
/// trimmed and the non-empty lines are joined with a single space.
///
/// # Errors
///
/// `ExtractionError::NotFound` if either marker is absent or empty, which
/// means the page lacks the structure of a product page.
///
/// # Example
///
/// ```
/// use product_crawler::crawler::extract_fields;
///
/// let html = r#"<html><head><title>Perfume</title></head>
///     <body><div class="productName">Hypnôse 30ml</div></body></html>"#;
/// let fields = extract_fields(html).unwrap();
/// assert_eq!(fields.product_name, "Hypnôse 30ml");
/// assert_eq!(fields.page_title, "Perfume");
/// ```
pub fn extract_fields(html: &str) -> Result<ProductFields, ExtractionError> {
    let document = Html::parse_document(html);

    let product_name = first_text(&document, PRODUCT_NAME_SELECTOR)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let page_title = first_text(&document, TITLE_SELECTOR)?.trim().to_string();

    if product_name.is_empty() {
        return Err(ExtractionError::NotFound(PRODUCT_NAME_SELECTOR.to_string()));
    }

    if page_title.is_empty() {
        return Err(ExtractionError::NotFound(TITLE_SELECTOR.to_string()));
    }

    Ok(ProductFields {
        product_name,
        page_title,
    })
}

/// Extracts every on-site link from the page
///
/// `<a href>` values are kept when they are root-relative paths (resolved
/// against the site's base URL) or absolute URLs on the same origin.
/// The result is deduplicated and sorted.
pub fn extract_links(html: &str, scope: &SiteScope) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let link = element
                .value()
                .attr("href")
                .and_then(|href| scope.resolve_link(href));

            if let Some(link) = link {
                links.insert(link);
            }
        }
    }

    links
}

/// Returns the text of the first element matching `css`
fn first_text(document: &Html, css: &str) -> Result<String, ExtractionError> {
    let selector =
        Selector::parse(css).map_err(|e| ExtractionError::Selector(format!("{}: {:?}", css, e)))?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| ExtractionError::NotFound(css.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> SiteScope {
        SiteScope::new("http://www.epocacosmeticos.com.br").unwrap()
    }

    fn product_page(title: &str, name: &str) -> String {
        format!(
            r#"<html><head><title>{}</title></head>
            <body><div class="productName">{}</div></body></html>"#,
            title, name
        )
    }

    #[test]
    fn test_extract_fields() {
        let html = product_page("My first Fake Product", "Fake Product 1");
        let fields = extract_fields(&html).unwrap();
        assert_eq!(
            fields,
            ProductFields {
                product_name: "Fake Product 1".to_string(),
                page_title: "My first Fake Product".to_string(),
            }
        );
    }

    #[test]
    fn test_multiline_product_name_is_joined() {
        let html = product_page(
            "Hypnôse Lancôme - Perfume Feminino",
            "\n   Hypnôse Eau de Toilette Lancôme\n   - Perfume Feminino - 30ml\n  ",
        );
        let fields = extract_fields(&html).unwrap();
        assert_eq!(
            fields.product_name,
            "Hypnôse Eau de Toilette Lancôme - Perfume Feminino - 30ml"
        );
    }

    #[test]
    fn test_first_product_name_wins() {
        let html = r#"<html><head><title>T</title></head><body>
            <h1 class="productName">First</h1>
            <h2 class="productName">Second</h2>
        </body></html>"#;
        assert_eq!(extract_fields(html).unwrap().product_name, "First");
    }

    #[test]
    fn test_missing_product_name() {
        let html = r#"<html><head><title>Home</title></head><body></body></html>"#;
        assert!(matches!(
            extract_fields(html),
            Err(ExtractionError::NotFound(ref marker)) if marker == ".productName"
        ));
    }

    #[test]
    fn test_missing_title() {
        let html = r#"<html><head></head><body><div class="productName">X</div></body></html>"#;
        assert!(matches!(
            extract_fields(html),
            Err(ExtractionError::NotFound(ref marker)) if marker == "head > title"
        ));
    }

    #[test]
    fn test_extract_root_relative_links() {
        let html = r#"<html><body>
            <a href="/produto_1/p">1</a>
            <a href="/pagina_2">2</a>
        </body></html>"#;
        let links = extract_links(html, &scope());
        assert_eq!(
            links.into_iter().collect::<Vec<_>>(),
            vec![
                "http://www.epocacosmeticos.com.br/pagina_2".to_string(),
                "http://www.epocacosmeticos.com.br/produto_1/p".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_absolute_same_site_links() {
        let html = r#"<a href="http://www.epocacosmeticos.com.br/perfumes">P</a>"#;
        let links = extract_links(html, &scope());
        assert!(links.contains("http://www.epocacosmeticos.com.br/perfumes"));
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let html = r#"
            <a href="/produto_3/p">a</a>
            <a href="/produto_3/p">b</a>
            <a href="http://www.epocacosmeticos.com.br/produto_3/p">c</a>
        "#;
        assert_eq!(extract_links(html, &scope()).len(), 1);
    }

    #[test]
    fn test_off_site_and_special_links_are_skipped() {
        let html = r##"<html><body>
            <a href="https://www.facebook.com/epoca">fb</a>
            <a href="mailto:sac@epoca.com.br">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="#top">top</a>
            <a href="relative/page">rel</a>
            <a>no href</a>
        </body></html>"##;
        assert!(extract_links(html, &scope()).is_empty());
    }
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including resuming from checkpoints.

use product_crawler::config::Config;
use product_crawler::crawler::run_crawl;
use product_crawler::output::{read_records, CrawlStatistics, ProductRecord};
use product_crawler::state::PageState;
use product_crawler::storage::{open_state_store, StateStore};
use product_crawler::url::SiteScope;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.retry_delay_ms = 10;
    config.crawler.workers = 4;
    config.crawler.request_timeout_secs = 5;
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// A plain page linking to the given root-relative paths
fn link_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    html(format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, anchors
    ))
}

/// A product page with the expected markers
fn product_page(name: &str, title: &str) -> ResponseTemplate {
    html(format!(
        r#"<html><head><title>{}</title></head>
        <body><div class="productName">{}</div><a href="/">home</a></body></html>"#,
        title, name
    ))
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response);
    let mock = match times {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}

/// Mounts a home page linking to three products and one category page
///
/// The category page links to a fourth product only reachable at depth 2.
async fn mount_shop(server: &MockServer) {
    mount_get(
        server,
        "/",
        link_page("Home", &["/p1/p", "/p2/p", "/p3/p", "/b"]),
        None,
    )
    .await;
    mount_get(server, "/p1/p", product_page("Product 1", "Product 1 - Loja"), None).await;
    mount_get(server, "/p2/p", product_page("Product 2", "Product 2 - Loja"), None).await;
    mount_get(server, "/p3/p", product_page("Product 3", "Product 3 - Loja"), None).await;
    mount_get(server, "/b", link_page("Category", &["/p4/p"]), None).await;
    mount_get(server, "/p4/p", product_page("Product 4", "Product 4 - Loja"), None).await;
}

fn record(base: &str, n: u32) -> ProductRecord {
    ProductRecord {
        product_name: format!("Product {}", n),
        page_title: format!("Product {} - Loja", n),
        url: format!("{}/p{}/p", base, n),
    }
}

fn sorted_records(output: &Path) -> Vec<ProductRecord> {
    let mut records = read_records(output).expect("Failed to read output");
    records.sort();
    records
}

async fn crawl(
    base: &str,
    start: &str,
    depth: u32,
    output: &Path,
    resume: Option<&Path>,
) -> CrawlStatistics {
    let config = create_test_config(base);
    let seed = SiteScope::new(base)
        .expect("Invalid base URL")
        .resolve_seed(start)
        .expect("Invalid seed");

    run_crawl(config, seed, depth, output, resume)
        .await
        .expect("Crawl failed")
}

#[tokio::test]
async fn test_crawl_finds_products_at_depth_one() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_shop(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = crawl(&base, "/", 1, &output, None).await;

    assert_eq!(
        sorted_records(&output),
        vec![record(&base, 1), record(&base, 2), record(&base, 3)]
    );
    assert_eq!(stats.records_written, 3);
    assert_eq!(stats.pages_in(PageState::Product), 3);
    assert_eq!(stats.pages_in(PageState::Page), 2);
    assert_eq!(stats.total_errors(), 0);
    assert!(!stats.resumed);
}

#[tokio::test]
async fn test_depth_bound_is_respected() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(&server, "/", link_page("Home", &["/b", "/p1/p"]), Some(1)).await;
    mount_get(&server, "/b", link_page("Category", &[]), Some(0)).await;
    mount_get(&server, "/p1/p", product_page("Product 1", "Product 1 - Loja"), Some(0)).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = crawl(&base, "/", 0, &output, None).await;

    assert!(sorted_records(&output).is_empty());
    assert_eq!(stats.total_pages(), 1);
}

#[tokio::test]
async fn test_product_seed_at_depth_zero() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_shop(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    crawl(&base, "/p1/p", 0, &output, None).await;

    assert_eq!(sorted_records(&output), vec![record(&base, 1)]);
}

#[tokio::test]
async fn test_redirected_product_is_not_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();
    let target = format!("{}/?ProductLinkNotFound=gone", base);

    Mock::given(method("GET"))
        .and(path("/gone/p"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", target.as_str()))
        .mount(&server)
        .await;
    // The landing page carries product markup, so only the redirect check
    // keeps it out of the output.
    mount_get(&server, "/", product_page("Not a product", "Home"), None).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = crawl(&base, "/gone/p", 0, &output, None).await;

    assert!(sorted_records(&output).is_empty());
    assert_eq!(stats.pages_in(PageState::Page), 1);
}

#[tokio::test]
async fn test_product_without_markup_is_skipped_but_links_followed() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_get(&server, "/", link_page("Home", &["/bare/p"]), None).await;
    mount_get(&server, "/bare/p", link_page("Bare", &["/p1/p"]), Some(1)).await;
    mount_get(&server, "/p1/p", product_page("Product 1", "Product 1 - Loja"), Some(1)).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = crawl(&base, "/", 2, &output, None).await;

    assert_eq!(sorted_records(&output), vec![record(&base, 1)]);
    assert_eq!(stats.pages_in(PageState::ExtractionFailed), 1);
}

#[tokio::test]
async fn test_retry_recovers_transient_failure() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/p1/p"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_get(&server, "/p1/p", product_page("Product 1", "Product 1 - Loja"), Some(1)).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    crawl(&base, "/p1/p", 0, &output, None).await;

    assert_eq!(sorted_records(&output), vec![record(&base, 1)]);
}

#[tokio::test]
async fn test_retry_budget_exhausted_skips_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/", link_page("Home", &["/down/p", "/p1/p"]), None).await;
    mount_get(&server, "/down/p", ResponseTemplate::new(500), Some(3)).await;
    mount_get(&server, "/p1/p", product_page("Product 1", "Product 1 - Loja"), None).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = crawl(&base, "/", 1, &output, None).await;

    assert_eq!(sorted_records(&output), vec![record(&base, 1)]);
    assert_eq!(stats.pages_in(PageState::FetchFailed), 1);
}

#[tokio::test]
async fn test_pages_are_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(&server, "/", link_page("Home", &["/a", "/b", "/"]), Some(1)).await;
    mount_get(&server, "/a", link_page("A", &["/", "/b", "/a"]), Some(1)).await;
    mount_get(&server, "/b", link_page("B", &["/a", "/p1/p"]), Some(1)).await;
    mount_get(&server, "/p1/p", product_page("Product 1", "Product 1 - Loja"), Some(1)).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let stats = crawl(&base, "/", 3, &output, None).await;

    assert_eq!(sorted_records(&output), vec![record(&base, 1)]);
    assert_eq!(stats.total_pages(), 4);
}

#[tokio::test]
async fn test_large_level_is_split_into_batches() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(
        &server,
        "/",
        link_page("Home", &["/p1/p", "/p2/p", "/p3/p", "/p4/p", "/p5/p"]),
        Some(1),
    )
    .await;
    for n in 1..=5 {
        mount_get(
            &server,
            &format!("/p{}/p", n),
            product_page(&format!("Product {}", n), &format!("Product {} - Loja", n)),
            Some(1),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let mut config = create_test_config(&base);
    config.crawler.batch_capacity = 2;
    let seed = SiteScope::new(&base).unwrap().resolve_seed("/").unwrap();
    let stats = run_crawl(config, seed, 1, &output, None).await.unwrap();

    // one batch for the seed level, then 2 + 2 + 1
    assert_eq!(stats.batches, 4);
    assert_eq!(stats.records_written, 5);
    assert_eq!(sorted_records(&output).len(), 5);
}

#[tokio::test]
async fn test_fresh_run_truncates_output() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_shop(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    std::fs::write(&output, "stale,row,http://old.test/x/p\n").unwrap();

    crawl(&base, "/p2/p", 0, &output, None).await;

    assert_eq!(sorted_records(&output), vec![record(&base, 2)]);
}

/// Runs depth 0, then resumes to depth 1, then resumes again at depth 1
async fn assert_resume_continues(checkpoint_name: &str) {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_get(
        &server,
        "/",
        link_page("Home", &["/p1/p", "/p2/p", "/p3/p", "/b"]),
        Some(1),
    )
    .await;
    for n in 1..=3 {
        mount_get(
            &server,
            &format!("/p{}/p", n),
            product_page(&format!("Product {}", n), &format!("Product {} - Loja", n)),
            Some(1),
        )
        .await;
    }
    mount_get(&server, "/b", link_page("Category", &["/p4/p"]), Some(1)).await;
    mount_get(&server, "/p4/p", product_page("Product 4", "Product 4 - Loja"), Some(0)).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let checkpoint = dir.path().join(checkpoint_name);

    let first = crawl(&base, "/", 0, &output, Some(&checkpoint)).await;
    assert!(!first.resumed);
    assert!(sorted_records(&output).is_empty());

    let saved = open_state_store(&checkpoint)
        .unwrap()
        .load()
        .unwrap()
        .expect("No checkpoint saved");
    assert_eq!(saved.depth, 1);
    assert_eq!(saved.visited, vec![format!("{}/", base)]);
    assert_eq!(saved.horizon.len(), 4);

    let second = crawl(&base, "/", 1, &output, Some(&checkpoint)).await;
    assert!(second.resumed);
    assert_eq!(second.records_written, 3);
    assert_eq!(
        sorted_records(&output),
        vec![record(&base, 1), record(&base, 2), record(&base, 3)]
    );

    // Same depth again: nothing left to do, output unchanged
    let third = crawl(&base, "/", 1, &output, Some(&checkpoint)).await;
    assert_eq!(third.total_pages(), 0);
    assert_eq!(sorted_records(&output).len(), 3);
}

#[tokio::test]
async fn test_resume_from_json_checkpoint() {
    assert_resume_continues("state.json").await;
}

#[tokio::test]
async fn test_resume_from_sqlite_checkpoint() {
    assert_resume_continues("state.db").await;
}

#[tokio::test]
async fn test_resume_with_missing_checkpoint_starts_fresh() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_shop(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let checkpoint = dir.path().join("missing.json");

    let stats = crawl(&base, "/p3/p", 0, &output, Some(&checkpoint)).await;

    assert!(!stats.resumed);
    assert_eq!(sorted_records(&output), vec![record(&base, 3)]);
    assert!(checkpoint.exists());
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to serve entry and collection pages over real
//! HTTP and a scripted browser session standing in for Chromium.

use async_trait::async_trait;
use ecommerce_crawler::config::{Config, OutputConfig, OutputFormat};
use ecommerce_crawler::crawler::{crawl, Coordinator, HttpFetcher};
use ecommerce_crawler::output::{open_sink, JsonLinesSink};
use ecommerce_crawler::{parse_domains, CrawlerError};
use ecommerce_crawler::render::{
    BrowserError, BrowserSession, SCROLL_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Browser stand-in: returns pre-rendered HTML for each URL and grows the
/// document once before settling
struct RenderedPages {
    pages: HashMap<String, String>,
    heights: Vec<u64>,
    measured: usize,
    current: String,
    closes: Arc<Mutex<usize>>,
}

impl RenderedPages {
    fn new(pages: Vec<(String, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            heights: vec![800, 1600, 1600],
            measured: 0,
            current: String::new(),
            closes: Arc::new(Mutex::new(0)),
        }
    }
}

#[async_trait]
impl BrowserSession for RenderedPages {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.current = url.to_string();
        self.measured = 0;
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> Result<Value, BrowserError> {
        match script {
            SCROLL_TO_BOTTOM_SCRIPT => Ok(Value::Null),
            SCROLL_HEIGHT_SCRIPT => {
                let index = self.measured.min(self.heights.len() - 1);
                self.measured += 1;
                Ok(Value::from(self.heights[index]))
            }
            other => Err(BrowserError::Script(other.to_string())),
        }
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        self.pages
            .get(&self.current)
            .cloned()
            .ok_or_else(|| BrowserError::PageSource(format!("no page for {}", self.current)))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        *self.closes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Settings pointed at the mock server: plain http, no delays
fn create_test_config(output: &std::path::Path, format: OutputFormat) -> Config {
    let mut config = Config::default();
    config.crawler.seed_scheme = "http".to_string();
    config.crawler.download_delay_ms = 0;
    config.crawler.max_retries = 0;
    config.crawler.request_timeout_secs = 5;
    config.browser.settle_delay_ms = 0;
    config.browser.scroll_delay_ms = 0;
    config.output = OutputConfig {
        path: output.to_string_lossy().into_owned(),
        format,
    };
    config
}

fn authority(server: &MockServer) -> String {
    let url = url::Url::parse(&server.uri()).expect("Failed to parse base URL");
    format!(
        "{}:{}",
        url.host_str().expect("Failed to extract host"),
        url.port().expect("Mock server has a port")
    )
}

async fn mount_html(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn collection_fetches(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path().starts_with("/collections/"))
        .count()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let domain = authority(&mock_server);

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/collections/shoes">Shoes</a>
            <a href="/pages/about">About</a>
        </body></html>"#,
    )
    .await;

    mount_html(&mock_server, "/collections/shoes", "<html>loading</html>").await;

    let session = RenderedPages::new(vec![
        (
            format!("{}/collections/shoes", base_url),
            r#"<html><body>
                <a href="/products/a">A</a>
                <a href="/products/b">B</a>
                <a href="/collections/shoes?page=2" aria-label="Next page">&rarr;</a>
            </body></html>"#
                .to_string(),
        ),
        (
            format!("{}/collections/shoes?page=2", base_url),
            r#"<html><body>
                <a href="/products/b">B</a>
                <a href="/products/c">C</a>
            </body></html>"#
                .to_string(),
        ),
    ]);
    let closes = Arc::clone(&session.closes);

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("products.jsonl");
    let config = create_test_config(&output_path, OutputFormat::Jsonl);

    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent).unwrap();
    let sink = JsonLinesSink::create(&output_path).unwrap();
    let coordinator = Coordinator::new(
        &config,
        parse_domains(Some(domain.as_str())).unwrap(),
        Arc::new(fetcher),
        Box::new(session),
        Box::new(sink),
    )
    .unwrap();

    let stats = coordinator.run().await.expect("Crawl should succeed");

    let content = std::fs::read_to_string(&output_path).unwrap();
    let records: Vec<Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 3, "Expected three unique products");
    for (record, product) in records.iter().zip(["a", "b", "c"]) {
        assert_eq!(record["domain"], domain.as_str());
        assert_eq!(
            record["product_url"],
            format!("{}/products/{}", base_url, product).as_str()
        );
    }

    assert_eq!(collection_fetches(&mock_server).await, 2);
    assert_eq!(stats.collection_pages_rendered, 2);
    assert_eq!(stats.products_emitted, 3);
    assert_eq!(*closes.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_collection_http_error_abandons_branch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let domain = authority(&mock_server);

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/collections/broken">Broken</a><a href="/category/hats">Hats</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/collections/broken"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/category/hats", "<html></html>").await;

    let session = RenderedPages::new(vec![(
        format!("{}/category/hats", base_url),
        r#"<a href="/product/fedora">Fedora</a>"#.to_string(),
    )]);

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("products.json");
    let config = create_test_config(&output_path, OutputFormat::Json);

    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent).unwrap();
    let coordinator = Coordinator::new(
        &config,
        parse_domains(Some(domain.as_str())).unwrap(),
        Arc::new(fetcher),
        Box::new(session),
        open_sink(&config.output).unwrap(),
    )
    .unwrap();

    let stats = coordinator.run().await.expect("Crawl should succeed");

    let content = std::fs::read_to_string(&output_path).unwrap();
    let records: Value = serde_json::from_str(&content).unwrap();
    let records = records.as_array().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0]["product_url"],
        format!("{}/product/fedora", base_url).as_str()
    );
    assert_eq!(stats.branches_abandoned, 1);
    assert_eq!(stats.collection_pages_rendered, 1);
}

#[tokio::test]
async fn test_unreachable_entry_page_finishes_cleanly() {
    let mock_server = MockServer::start().await;
    let domain = authority(&mock_server);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let session = RenderedPages::new(Vec::new());
    let closes = Arc::clone(&session.closes);

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("products.db");
    let config = create_test_config(&output_path, OutputFormat::Sqlite);

    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent).unwrap();
    let coordinator = Coordinator::new(
        &config,
        parse_domains(Some(domain.as_str())).unwrap(),
        Arc::new(fetcher),
        Box::new(session),
        open_sink(&config.output).unwrap(),
    )
    .unwrap();

    let stats = coordinator.run().await.expect("Crawl should succeed");

    assert_eq!(stats.seeds_failed, 1);
    assert_eq!(stats.products_emitted, 0);
    assert_eq!(collection_fetches(&mock_server).await, 0);
    assert_eq!(*closes.lock().unwrap(), 1);
    assert!(output_path.exists());
}

#[tokio::test]
async fn test_missing_browser_is_reported_before_any_request() {
    let mock_server = MockServer::start().await;
    let domain = authority(&mock_server);
    mount_html(&mock_server, "/", r#"<a href="/collections/shoes">Shoes</a>"#).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("products.jsonl");
    let mut config = create_test_config(&output_path, OutputFormat::Jsonl);
    config.browser.chrome_executable = Some("/nonexistent/chrome".to_string());

    let result = Coordinator::launch(&config, parse_domains(Some(domain.as_str())).unwrap()).await;

    assert!(matches!(result, Err(CrawlerError::BrowserSetup(_))));
    assert!(mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
    assert!(!output_path.exists());
}

#[tokio::test]
async fn test_browser_launch_failure_keeps_previous_output() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("products.json");
    let previous = r#"[{"domain":"shop.example.com","product_url":"https://shop.example.com/products/a"}]"#;
    std::fs::write(&output_path, previous).unwrap();

    let mut config = create_test_config(&output_path, OutputFormat::Json);
    config.browser.chrome_executable = Some("/nonexistent/chrome".to_string());

    let result = crawl(&config, parse_domains(Some("shop.example.com")).unwrap()).await;

    assert!(matches!(result, Err(CrawlerError::BrowserSetup(_))));
    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), previous);
}

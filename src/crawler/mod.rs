//! Crawler module for fetching, extracting and traversing collection pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic and per-domain delay
//! - HTML link extraction
//! - Collection page processing (products and next link)
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod processor;
mod throttle;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{document_base, extract_links};
pub use processor::{CollectionPage, CollectionProcessor};
pub use throttle::DomainThrottle;

use crate::config::{Config, CrawlTarget};
use crate::output::CrawlStatistics;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and launch the headless browser
/// 2. Open the configured output sink
/// 3. Discover collection pages on every target
/// 4. Render and paginate each collection, writing products as found
/// 5. Close the browser and finalise the output
pub async fn crawl(config: &Config, targets: Vec<CrawlTarget>) -> Result<CrawlStatistics> {
    let coordinator = Coordinator::launch(config, targets).await?;
    coordinator.run().await
}

//! Ecommerce-Crawler: a collection-page product harvester
//!
//! This crate discovers e-commerce collection (category) pages on a set of
//! domains, renders their infinite-scroll content in a headless browser,
//! extracts product-detail URLs and follows pagination until exhaustion.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser session setup failed: {0}")]
    BrowserSetup(#[source] render::BrowserError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Render failed for {url} during {phase}: {source}")]
    Render {
        url: String,
        phase: render::RenderPhase,
        source: render::BrowserError,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No domains supplied: pass a comma-separated list such as 'shop.example.com,store.example.org'")]
    MissingDomains,

    #[error("Invalid domain '{0}'")]
    InvalidDomain(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{parse_domains, Config, CrawlTarget};
pub use output::ProductRecord;
pub use state::{VisitedSet, VisitedSets};
pub use url::{classify, UrlClass};

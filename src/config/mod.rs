//! Configuration module for the crawler
//!
//! This module handles the domain list, the optional TOML settings file,
//! and validation of both.
//!
//! # Example
//!
//! ```no_run
//! use ecommerce_crawler::config::{load_config, parse_domains};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! let targets = parse_domains(config.domains.as_deref()).unwrap();
//! println!("Crawling {} domains", targets.len());
//! ```

mod parser;
mod targets;
mod types;
mod validation;

// Re-export types
pub use targets::{parse_domains, CrawlTarget};
pub use types::{
    BrowserConfig, Config, CrawlerConfig, KeywordConfig, OutputConfig, OutputFormat,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

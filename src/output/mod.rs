//! Output module for product feeds and crawl summaries
//!
//! This module handles:
//! - The `ProductRecord` the crawler emits
//! - Writing records to JSON Lines, JSON or SQLite
//! - Reporting crawl statistics

mod json;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json::{JsonArraySink, JsonLinesSink};
pub use sqlite_output::SqliteSink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ProductRecord, ProductSink};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;

/// Opens the sink selected by the output configuration
pub fn open_sink(config: &OutputConfig) -> OutputResult<Box<dyn ProductSink>> {
    let path = Path::new(&config.path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let sink: Box<dyn ProductSink> = match config.format {
        OutputFormat::Jsonl => Box::new(JsonLinesSink::create(path)?),
        OutputFormat::Json => Box::new(JsonArraySink::create(path)?),
        OutputFormat::Sqlite => Box::new(SqliteSink::open(path)?),
    };

    tracing::info!("Writing {} output to {}", config.format, config.path);
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_sink_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/products.jsonl");
        let config = OutputConfig {
            path: path.to_string_lossy().into_owned(),
            format: OutputFormat::Jsonl,
        };

        let mut sink = open_sink(&config).unwrap();
        sink.write(&ProductRecord {
            domain: "shop.example.com".to_string(),
            product_url: "https://shop.example.com/products/a".to_string(),
        })
        .unwrap();
        sink.finish().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_open_sqlite_sink() {
        let dir = tempdir().unwrap();
        let config = OutputConfig {
            path: dir.path().join("products.db").to_string_lossy().into_owned(),
            format: OutputFormat::Sqlite,
        };

        let mut sink = open_sink(&config).unwrap();
        sink.finish().unwrap();
    }
}

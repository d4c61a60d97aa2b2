//! Output sink traits and types
//!
//! This module defines the record the crawler emits and the trait every
//! feed sink implements.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One discovered product page
///
/// `domain` is the authority of the collection page the link was found on,
/// not of the product URL itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub domain: String,
    pub product_url: String,
}

/// Destination for emitted product records
///
/// Records are written as soon as they are found, so a crawl that stops
/// early still leaves everything extracted up to that point.
pub trait ProductSink: Send {
    /// Writes one record
    fn write(&mut self, record: &ProductRecord) -> OutputResult<()>;

    /// Completes the output (closing brackets, final flush)
    fn finish(&mut self) -> OutputResult<()>;
}

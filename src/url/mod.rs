//! URL handling module
//!
//! This module provides keyword-based URL classification, authority
//! extraction for product attribution, and allowed-domain matching.

mod domain;
mod matcher;

use crate::config::KeywordConfig;
use url::Url;

// Re-export main functions
pub use domain::extract_authority;
pub use matcher::is_within_domain;

/// Role of a URL in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlClass {
    /// Category/listing page to render and paginate
    Collection,
    /// Product-detail page to emit as a record
    Product,
    /// Anything else
    Neither,
}

/// Returns true if any collection keyword occurs anywhere in the URL string
pub fn is_collection_url(url: &Url, keywords: &KeywordConfig) -> bool {
    let url = url.as_str();
    keywords
        .collection
        .iter()
        .any(|keyword| url.contains(keyword.as_str()))
}

/// Returns true if the URL path holds a product keyword as a full segment
/// followed by at least one more path component (`/{keyword}/...`)
pub fn is_product_url(url: &Url, keywords: &KeywordConfig) -> bool {
    let path = url.path();
    keywords
        .product
        .iter()
        .any(|keyword| path.contains(&format!("/{}/", keyword)))
}

/// Classifies an absolute URL by keyword
///
/// The collection test takes precedence when both tests match.
///
/// # Examples
///
/// ```
/// use ecommerce_crawler::config::KeywordConfig;
/// use ecommerce_crawler::url::{classify, UrlClass};
/// use url::Url;
///
/// let keywords = KeywordConfig::default();
/// let url = Url::parse("https://shop.example.com/collections/shoes").unwrap();
/// assert_eq!(classify(&url, &keywords), UrlClass::Collection);
///
/// let url = Url::parse("https://shop.example.com/products/red-shoe").unwrap();
/// assert_eq!(classify(&url, &keywords), UrlClass::Product);
///
/// let url = Url::parse("https://shop.example.com/about").unwrap();
/// assert_eq!(classify(&url, &keywords), UrlClass::Neither);
/// ```
pub fn classify(url: &Url, keywords: &KeywordConfig) -> UrlClass {
    if is_collection_url(url, keywords) {
        UrlClass::Collection
    } else if is_product_url(url, keywords) {
        UrlClass::Product
    } else {
        UrlClass::Neither
    }
}

//! HTML parser for extracting links
//!
//! This module handles parsing HTML content to extract:
//! - The effective base URL (honoring `<base href>`)
//! - Absolute http(s) URLs from `<a href>` anchors

use scraper::{Html, Selector};
use url::Url;

/// Returns the URL relative links on this document resolve against
///
/// A `<base href>` in the document wins over the page URL when it resolves.
pub fn document_base(document: &Html, page_url: &Url) -> Url {
    let Ok(selector) = Selector::parse("base[href]") else {
        return page_url.clone();
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// Extracts every followable anchor target from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anything, resolved against the document base
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Non-HTTP(S) URLs after resolution
///
/// # Example
///
/// ```
/// use ecommerce_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/collections/shoes">Shoes</a></body></html>"#;
/// let page = Url::parse("https://shop.example.com/").unwrap();
/// let links = extract_links(html, &page);
/// assert_eq!(links[0].as_str(), "https://shop.example.com/collections/shoes");
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, &base))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub(crate) fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}

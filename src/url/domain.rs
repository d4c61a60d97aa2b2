use url::Url;

/// Extracts the authority (host and explicit port) from a URL
///
/// The host is lowercased; a port is appended only when the URL carries a
/// non-default one. User info is never included.
///
/// # Returns
///
/// * `Some(String)` - The lowercase `host[:port]`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ecommerce_crawler::url::extract_authority;
///
/// let url = Url::parse("https://shop.example.com/collections/all").unwrap();
/// assert_eq!(extract_authority(&url), Some("shop.example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/collections/all").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

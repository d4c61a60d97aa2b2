/// Checks if a host belongs to an allowed domain
///
/// A host matches when it equals the allowed domain or is any subdomain of
/// it. A port on the allowed domain (`127.0.0.1:8080`) is ignored, since
/// only hosts are compared.
///
/// # Examples
///
/// ```
/// use ecommerce_crawler::url::is_within_domain;
///
/// assert!(is_within_domain("example.com", "example.com"));
/// assert!(is_within_domain("example.com", "shop.example.com"));
/// assert!(is_within_domain("example.com", "api.v2.example.com"));
/// assert!(!is_within_domain("example.com", "example.org"));
/// assert!(!is_within_domain("example.com", "myexample.com"));
/// ```
pub fn is_within_domain(allowed: &str, host: &str) -> bool {
    let allowed = match allowed.rsplit_once(':') {
        Some((host_part, port)) if port.chars().all(|c| c.is_ascii_digit()) => host_part,
        _ => allowed,
    };

    if allowed.is_empty() || host.is_empty() {
        return false;
    }

    host == allowed || host.ends_with(&format!(".{}", allowed))
}

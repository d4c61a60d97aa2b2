//! Crawl targets built from the comma-separated domain list

use crate::config::validation::validate_domain_string;
use crate::ConfigError;
use url::Url;

/// One allowed domain and the entry point derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    domain: String,
}

impl CrawlTarget {
    /// The bare domain (optionally with `:port`), with IDNA hosts in punycode form
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Builds the entry point `{scheme}://{domain}`
    pub fn seed_url(&self, scheme: &str) -> Result<Url, ConfigError> {
        Url::parse(&format!("{}://{}", scheme, self.domain))
            .map_err(|e| ConfigError::InvalidDomain(format!("{}: {}", self.domain, e)))
    }
}

/// Parses the comma-separated domain list into crawl targets
///
/// Entries are trimmed and lowercased, blanks are dropped and repeated
/// domains are kept once in first-seen order.
///
/// # Errors
///
/// * `ConfigError::MissingDomains` - the input is absent or holds no domains
/// * `ConfigError::InvalidDomain` - an entry is not a bare host
///
/// # Example
///
/// ```
/// use ecommerce_crawler::config::parse_domains;
///
/// let targets = parse_domains(Some("shop.example.com, store.example.org")).unwrap();
/// assert_eq!(targets.len(), 2);
/// assert_eq!(targets[0].domain(), "shop.example.com");
/// ```
pub fn parse_domains(raw: Option<&str>) -> Result<Vec<CrawlTarget>, ConfigError> {
    let raw = raw.ok_or(ConfigError::MissingDomains)?;
    let mut targets: Vec<CrawlTarget> = Vec::new();

    for entry in raw.split(',') {
        let domain = entry.trim().to_lowercase();
        if domain.is_empty() {
            continue;
        }

        validate_domain_string(&domain)?;
        let domain = canonical_domain(&domain)?;

        if targets.iter().any(|t| t.domain == domain) {
            tracing::debug!("Ignoring repeated domain {}", domain);
            continue;
        }
        targets.push(CrawlTarget { domain });
    }

    if targets.is_empty() {
        return Err(ConfigError::MissingDomains);
    }

    Ok(targets)
}

/// Rewrites the host the way `Url` stores it (IDNA to punycode), keeping
/// any explicit port, so configured domains compare equal to parsed hosts
fn canonical_domain(domain: &str) -> Result<String, ConfigError> {
    let (host, port) = match domain.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (domain, None),
    };

    let parsed = Url::parse(&format!("http://{}/", host))
        .map_err(|e| ConfigError::InvalidDomain(format!("{}: {}", domain, e)))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ConfigError::InvalidDomain(domain.to_string()))?;

    Ok(match port {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

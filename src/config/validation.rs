use crate::config::types::{BrowserConfig, Config, CrawlerConfig, KeywordConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_keywords(&config.keywords)?;
    validate_output_config(&config.output)?;

    if config.user_agent.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.seed_scheme != "https" && config.seed_scheme != "http" {
        return Err(ConfigError::Validation(format!(
            "seed-scheme must be 'https' or 'http', got '{}'",
            config.seed_scheme
        )));
    }

    if config.max_pages_per_collection < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-per-collection must be >= 1, got {}",
            config.max_pages_per_collection
        )));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if config.max_scroll_iterations < 1 {
        return Err(ConfigError::Validation(format!(
            "max-scroll-iterations must be >= 1, got {}",
            config.max_scroll_iterations
        )));
    }

    if let Some(path) = &config.chrome_executable {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chrome-executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the keyword lists
///
/// Product keywords are interpolated into CSS attribute selectors, so they
/// must not carry quotes, slashes or whitespace.
fn validate_keywords(config: &KeywordConfig) -> Result<(), ConfigError> {
    if config.collection.is_empty() {
        return Err(ConfigError::Validation(
            "at least one collection keyword is required".to_string(),
        ));
    }

    if config.product.is_empty() {
        return Err(ConfigError::Validation(
            "at least one product keyword is required".to_string(),
        ));
    }

    for keyword in config.collection.iter().chain(config.product.iter()) {
        if keyword.is_empty() {
            return Err(ConfigError::Validation(
                "keywords cannot be empty".to_string(),
            ));
        }

        if keyword
            .chars()
            .any(|c| c == '/' || c == '"' || c == '\'' || c == '\\' || c.is_whitespace())
        {
            return Err(ConfigError::Validation(format!(
                "keyword '{}' contains a slash, quote or whitespace",
                keyword
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a bare domain, optionally followed by `:port`
pub(crate) fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    let (host, port) = match domain.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (domain, None),
    };

    if host.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "domain cannot be empty".to_string(),
        ));
    }

    if let Some(port) = port {
        if port.parse::<u16>().is_err() {
            return Err(ConfigError::InvalidDomain(format!(
                "'{}' has an invalid port",
                domain
            )));
        }
    }

    // Check for invalid characters (this also rejects schemes and paths)
    if !host
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' contains invalid characters",
            domain
        )));
    }

    // Check that it doesn't start or end with a dot or hyphen
    if host.starts_with('.') || host.ends_with('.') || host.starts_with('-') || host.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if host.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !host.contains('.') && host != "localhost" {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' must contain at least one dot (e.g., 'shop.example.com')",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_domain_string() {
        assert!(validate_domain_string("example.com").is_ok());
        assert!(validate_domain_string("shop.example.com").is_ok());
        assert!(validate_domain_string("127.0.0.1:8080").is_ok());
        assert!(validate_domain_string("localhost:3000").is_ok());

        assert!(validate_domain_string("").is_err());
        assert!(validate_domain_string("example").is_err());
        assert!(validate_domain_string(".example.com").is_err());
        assert!(validate_domain_string("example.com.").is_err());
        assert!(validate_domain_string("exa..mple.com").is_err());
        assert!(validate_domain_string("example.com:http").is_err());
        assert!(validate_domain_string("example.com/path").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent_requests = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_seed_scheme() {
        let mut config = Config::default();
        config.crawler.seed_scheme = "ftp".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_keyword_with_slash_or_quote() {
        let mut config = Config::default();
        config.keywords.product = vec!["products/".to_string()];
        assert!(validate(&config).is_err());

        config.keywords.product = vec!["pro\"ducts".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_keyword_lists() {
        let mut config = Config::default();
        config.keywords.collection.clear();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.keywords.product.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_scroll_bound() {
        let mut config = Config::default();
        config.browser.max_scroll_iterations = 0;
        assert!(validate(&config).is_err());
    }
}

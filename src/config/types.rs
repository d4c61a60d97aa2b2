use serde::Deserialize;

/// Main configuration structure for the crawler
///
/// Every section is optional in the settings file; missing keys fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comma-separated domain list, overridden by `--domains` on the CLI
    pub domains: Option<String>,
    pub crawler: CrawlerConfig,
    pub browser: BrowserConfig,
    pub keywords: KeywordConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum time between requests to the same domain (milliseconds)
    #[serde(rename = "download-delay-ms")]
    pub download_delay_ms: u64,

    /// Maximum number of HTTP fetches in flight
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Extra attempts for transient HTTP failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Scheme used to build seed URLs from bare domains
    #[serde(rename = "seed-scheme")]
    pub seed_scheme: String,

    /// Only schedule collection pages on configured domains and their subdomains
    #[serde(rename = "restrict-to-allowed-domains")]
    pub restrict_to_allowed_domains: bool,

    /// Upper bound on pages followed in one pagination chain
    #[serde(rename = "max-pages-per-collection")]
    pub max_pages_per_collection: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            download_delay_ms: 2000,
            max_concurrent_requests: 8,
            request_timeout_secs: 30,
            max_retries: 2,
            seed_scheme: "https".to_string(),
            restrict_to_allowed_domains: false,
            max_pages_per_collection: 500,
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,

    #[serde(rename = "window-width")]
    pub window_width: u32,

    #[serde(rename = "window-height")]
    pub window_height: u32,

    /// Wait after navigation before the first height measurement (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Wait after each scroll for lazy content to render (milliseconds)
    #[serde(rename = "scroll-delay-ms")]
    pub scroll_delay_ms: u64,

    /// Upper bound on scroll actions per page
    #[serde(rename = "max-scroll-iterations")]
    pub max_scroll_iterations: u32,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            settle_delay_ms: 3000,
            scroll_delay_ms: 2000,
            max_scroll_iterations: 50,
            chrome_executable: None,
        }
    }
}

/// Keyword lists driving URL classification and product selectors
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Substrings marking a collection (category) URL
    pub collection: Vec<String>,

    /// Path segments marking a product-detail URL
    pub product: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            collection: ["collections", "collection", "category", "categories"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            product: ["products", "product"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "ecommerce-crawler".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value as `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// Feed export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    Jsonl,
    /// A single JSON array
    Json,
    /// SQLite database with a `products` table
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "products.jsonl".to_string(),
            format: OutputFormat::Jsonl,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonl" | "jsonlines" => Ok(Self::Jsonl),
            "json" => Ok(Self::Json),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(format!(
                "unknown output format '{}', expected jsonl, json or sqlite",
                other
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Jsonl => "jsonl",
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

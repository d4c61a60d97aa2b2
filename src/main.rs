//! Ecommerce-Crawler main entry point
//!
//! This is the command-line interface for the collection-page product
//! harvester.

use anyhow::Context;
use clap::Parser;
use ecommerce_crawler::config::{load_config_with_hash, validate, Config, OutputFormat};
use ecommerce_crawler::crawler::crawl;
use ecommerce_crawler::output::print_statistics;
use ecommerce_crawler::{parse_domains, CrawlTarget};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ecommerce-Crawler: harvest product URLs from collection pages
///
/// Finds collection (category) pages on each domain, renders their
/// infinite-scroll listings in headless Chromium, and writes every product
/// page URL it finds while following pagination to the end.
#[derive(Parser, Debug)]
#[command(name = "ecommerce-crawler")]
#[command(version)]
#[command(about = "Harvest product URLs from e-commerce collection pages", long_about = None)]
struct Cli {
    /// Comma-separated domains to crawl (e.g. shop.example.com,store.example.org)
    #[arg(short, long, value_name = "DOMAINS")]
    domains: Option<String>,

    /// Path to TOML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (overrides [output] path)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Output format: jsonl, json or sqlite (overrides [output] format)
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    validate(&config).context("invalid settings")?;

    let domains = cli.domains.as_deref().or(config.domains.as_deref());
    let targets = parse_domains(domains)?;

    if cli.dry_run {
        handle_dry_run(&config, &targets)?;
        return Ok(());
    }

    handle_crawl(&config, targets).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ecommerce_crawler=info,warn"),
            1 => EnvFilter::new("ecommerce_crawler=debug,info"),
            2 => EnvFilter::new("ecommerce_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved settings and seed URLs
fn handle_dry_run(config: &Config, targets: &[CrawlTarget]) -> anyhow::Result<()> {
    println!("=== Ecommerce-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Download delay: {}ms", config.crawler.download_delay_ms);
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Max retries: {}", config.crawler.max_retries);
    println!(
        "  Max pages per collection: {}",
        config.crawler.max_pages_per_collection
    );
    println!(
        "  Restrict to allowed domains: {}",
        config.crawler.restrict_to_allowed_domains
    );

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Window: {}x{}",
        config.browser.window_width, config.browser.window_height
    );
    println!(
        "  Settle / scroll delay: {}ms / {}ms",
        config.browser.settle_delay_ms, config.browser.scroll_delay_ms
    );
    println!(
        "  Max scroll iterations: {}",
        config.browser.max_scroll_iterations
    );

    println!("\nKeywords:");
    println!("  Collection: {}", config.keywords.collection.join(", "));
    println!("  Product: {}", config.keywords.product.join(", "));

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  {} ({})", config.output.path, config.output.format);

    println!("\nSeeds ({}):", targets.len());
    for target in targets {
        let seed = target.seed_url(&config.crawler.seed_scheme)?;
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, targets: Vec<CrawlTarget>) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} domains: {}",
        targets.len(),
        targets
            .iter()
            .map(CrawlTarget::domain)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let stats = crawl(config, targets).await.context("crawl failed")?;

    println!();
    print_statistics(&stats);
    println!("\nProducts written to: {}", config.output.path);

    Ok(())
}

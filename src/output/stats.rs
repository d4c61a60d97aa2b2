//! Crawl statistics reporting
//!
//! The coordinator keeps live counters while it runs; this module holds the
//! final snapshot and prints it.

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Entry pages fetched successfully
    pub seeds_fetched: u64,

    /// Entry pages that could not be fetched
    pub seeds_failed: u64,

    /// Collection pages accepted for pagination
    pub collections_scheduled: u64,

    /// Collection pages rendered and processed
    pub collection_pages_rendered: u64,

    /// Product records written to the output
    pub products_emitted: u64,

    /// Pagination chains stopped by a fetch or render error
    pub branches_abandoned: u64,

    /// Pagination chains stopped by the page limit
    pub chains_truncated: u64,
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Entry pages:");
    println!("  Fetched: {}", stats.seeds_fetched);
    println!("  Failed: {}", stats.seeds_failed);
    println!();

    println!("Collections:");
    println!("  Scheduled: {}", stats.collections_scheduled);
    println!("  Pages rendered: {}", stats.collection_pages_rendered);
    if stats.branches_abandoned > 0 {
        println!("  Abandoned after errors: {}", stats.branches_abandoned);
    }
    if stats.chains_truncated > 0 {
        println!("  Stopped at page limit: {}", stats.chains_truncated);
    }
    println!();

    let per_page = if stats.collection_pages_rendered > 0 {
        stats.products_emitted as f64 / stats.collection_pages_rendered as f64
    } else {
        0.0
    };

    println!(
        "Products: {} ({:.1} per rendered page)",
        stats.products_emitted, per_page
    );
}

use crate::output::CrawlStatistics;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live crawl counters shared by every traversal branch
#[derive(Debug, Default)]
pub struct CrawlStats {
    seeds_fetched: AtomicU64,
    seeds_failed: AtomicU64,
    collections_scheduled: AtomicU64,
    collection_pages_rendered: AtomicU64,
    products_emitted: AtomicU64,
    branches_abandoned: AtomicU64,
    chains_truncated: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_fetched(&self) {
        self.seeds_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn seed_failed(&self) {
        self.seeds_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn collection_scheduled(&self) {
        self.collections_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn page_rendered(&self) {
        self.collection_pages_rendered
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn products_emitted(&self, count: u64) {
        self.products_emitted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn branch_abandoned(&self) {
        self.branches_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn chain_truncated(&self) {
        self.chains_truncated.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of every counter
    pub fn snapshot(&self) -> CrawlStatistics {
        CrawlStatistics {
            seeds_fetched: self.seeds_fetched.load(Ordering::Relaxed),
            seeds_failed: self.seeds_failed.load(Ordering::Relaxed),
            collections_scheduled: self.collections_scheduled.load(Ordering::Relaxed),
            collection_pages_rendered: self.collection_pages_rendered.load(Ordering::Relaxed),
            products_emitted: self.products_emitted.load(Ordering::Relaxed),
            branches_abandoned: self.branches_abandoned.load(Ordering::Relaxed),
            chains_truncated: self.chains_truncated.load(Ordering::Relaxed),
        }
    }
}

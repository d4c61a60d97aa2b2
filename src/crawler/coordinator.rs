//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal that coordinates all aspects of the
//! crawling process, including:
//! - Fetching each entry page and discovering collection links
//! - Running one sequential pagination chain per collection root
//! - Funnelling every new URL through the shared visited sets
//! - Writing product records as they are found
//! - Releasing the browser once no chain is left

use crate::config::{Config, CrawlTarget, CrawlerConfig, KeywordConfig};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::processor::CollectionProcessor;
use crate::output::{open_sink, CrawlStatistics, ProductSink};
use crate::render::{BrowserSession, ChromeSession, Renderer, ScrollSettings};
use crate::state::{CrawlPhase, CrawlStats, VisitedSets};
use crate::url::{classify, is_within_domain, UrlClass};
use crate::{CrawlerError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinSet;
use url::Url;

/// State shared by every traversal branch
struct CrawlContext {
    crawler: CrawlerConfig,
    keywords: KeywordConfig,
    targets: Vec<CrawlTarget>,
    fetcher: Arc<dyn PageFetcher>,
    renderer: Renderer,
    processor: CollectionProcessor,
    visited: Mutex<VisitedSets>,
    stats: CrawlStats,
    sink: Mutex<Box<dyn ProductSink>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CrawlContext {
    /// Applies `restrict-to-allowed-domains` to a collection URL
    fn is_allowed(&self, url: &Url) -> bool {
        if !self.crawler.restrict_to_allowed_domains {
            return true;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        self.targets
            .iter()
            .any(|target| is_within_domain(target.domain(), host))
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<CrawlContext>,
}

impl Coordinator {
    /// Builds the production coordinator: reqwest fetcher, a headless
    /// Chromium session and the configured output sink
    ///
    /// The sink is opened last, so a failed browser start leaves an existing
    /// output file untouched.
    ///
    /// # Errors
    ///
    /// * `CrawlerError::Config` - keywords do not form valid selectors
    /// * `CrawlerError::BrowserSetup` - Chromium could not be started
    /// * `CrawlerError::Output` - the output file could not be opened
    pub async fn launch(config: &Config, targets: Vec<CrawlTarget>) -> Result<Self> {
        let processor = CollectionProcessor::new(&config.keywords)?;
        let fetcher = Arc::new(HttpFetcher::new(&config.crawler, &config.user_agent)?);

        tracing::info!("Launching headless browser");
        let mut session = ChromeSession::launch(&config.browser)
            .await
            .map_err(CrawlerError::BrowserSetup)?;

        let sink = match open_sink(&config.output) {
            Ok(sink) => sink,
            Err(e) => {
                if let Err(close_error) = session.close().await {
                    tracing::warn!("Browser close after output failure: {}", close_error);
                }
                return Err(e.into());
            }
        };

        Ok(Self::assemble(
            config,
            targets,
            fetcher,
            Box::new(session),
            processor,
            sink,
        ))
    }

    /// Builds a coordinator around caller-supplied fetcher and browser session
    pub fn new(
        config: &Config,
        targets: Vec<CrawlTarget>,
        fetcher: Arc<dyn PageFetcher>,
        session: Box<dyn BrowserSession>,
        sink: Box<dyn ProductSink>,
    ) -> Result<Self> {
        let processor = CollectionProcessor::new(&config.keywords)?;
        Ok(Self::assemble(
            config, targets, fetcher, session, processor, sink,
        ))
    }

    fn assemble(
        config: &Config,
        targets: Vec<CrawlTarget>,
        fetcher: Arc<dyn PageFetcher>,
        session: Box<dyn BrowserSession>,
        processor: CollectionProcessor,
        sink: Box<dyn ProductSink>,
    ) -> Self {
        let renderer = Renderer::new(session, ScrollSettings::from(&config.browser));

        Self {
            context: Arc::new(CrawlContext {
                crawler: config.crawler.clone(),
                keywords: config.keywords.clone(),
                targets,
                fetcher,
                renderer,
                processor,
                visited: Mutex::new(VisitedSets::new()),
                stats: CrawlStats::new(),
                sink: Mutex::new(sink),
            }),
        }
    }

    /// Runs the crawl until no branch has work left
    ///
    /// Entry pages are fetched concurrently. Each discovered collection root
    /// starts its own pagination chain as soon as its entry page has been
    /// processed; chains run concurrently with each other but share the one
    /// browser. Errors inside a chain are logged and end only that chain.
    ///
    /// The browser is closed exactly once after the last chain finishes and
    /// the sink is then finalised.
    pub async fn run(self) -> Result<CrawlStatistics> {
        let context = self.context;

        let mut discoveries = JoinSet::new();
        for target in context.targets.clone() {
            discoveries.spawn(discover(Arc::clone(&context), target));
        }

        let mut chains = JoinSet::new();
        while let Some(joined) = discoveries.join_next().await {
            match joined {
                Ok(roots) => {
                    for root in roots {
                        chains.spawn(paginate(Arc::clone(&context), root));
                    }
                }
                Err(e) => tracing::error!("Discovery task failed: {}", e),
            }
        }

        while let Some(joined) = chains.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Pagination task failed: {}", e);
            }
        }

        match context.renderer.shutdown().await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Browser session was already closed"),
            Err(e) => tracing::warn!("Browser did not shut down cleanly: {}", e),
        }

        lock(&context.sink).finish()?;

        let stats = context.stats.snapshot();
        tracing::info!(
            "Crawl finished: {} products from {} collection pages",
            stats.products_emitted,
            stats.collection_pages_rendered
        );
        Ok(stats)
    }
}

/// Fetches one entry page and returns the collection roots it scheduled
async fn discover(context: Arc<CrawlContext>, target: CrawlTarget) -> Vec<Url> {
    let seed = match target.seed_url(&context.crawler.seed_scheme) {
        Ok(seed) => seed,
        Err(e) => {
            tracing::error!("[{}] Skipping {}: {}", CrawlPhase::Seeding, target.domain(), e);
            context.stats.seed_failed();
            return Vec::new();
        }
    };

    tracing::info!("[{}] Fetching entry page {}", CrawlPhase::Seeding, seed);
    let page = match context.fetcher.fetch(&seed).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("[{}] Entry page {} failed: {}", CrawlPhase::Seeding, seed, e);
            context.stats.seed_failed();
            return Vec::new();
        }
    };
    context.stats.seed_fetched();

    let links = extract_links(&page.body, &page.final_url);
    let mut roots = Vec::new();
    let mut product_links = 0usize;

    {
        let mut visited = lock(&context.visited);
        for link in links {
            match classify(&link, &context.keywords) {
                UrlClass::Collection => {
                    if !context.is_allowed(&link) {
                        tracing::debug!("Off-domain collection ignored: {}", link);
                        continue;
                    }
                    if visited.collections.mark_and_check(link.as_str()) {
                        tracing::debug!("Scheduling collection {}", link);
                        context.stats.collection_scheduled();
                        roots.push(link);
                    }
                }
                UrlClass::Product => product_links += 1,
                UrlClass::Neither => {}
            }
        }
    }

    if product_links > 0 {
        tracing::debug!(
            "{} product links on entry page {} left for collection pages",
            product_links,
            page.final_url
        );
    }

    tracing::info!(
        "[{}] {} new collection pages on {}",
        CrawlPhase::Discovering,
        roots.len(),
        page.final_url
    );
    roots
}

/// Follows one collection's next links until the chain ends
async fn paginate(context: Arc<CrawlContext>, root: Url) {
    let limit = context.crawler.max_pages_per_collection;
    let mut next = Some(root.clone());
    let mut pages = 0u32;

    while let Some(url) = next.take() {
        if pages >= limit {
            tracing::warn!(
                "[{}] Page limit of {} reached for {}, not following {}",
                CrawlPhase::Paginating,
                limit,
                root,
                url
            );
            context.stats.chain_truncated();
            break;
        }
        pages += 1;

        match process_collection_page(&context, &url).await {
            Ok(following) => next = following,
            Err(e) => {
                tracing::error!(
                    "[{}] Abandoning chain {} at {}: {}",
                    CrawlPhase::Paginating,
                    root,
                    url,
                    e
                );
                context.stats.branch_abandoned();
                return;
            }
        }
    }

    tracing::info!("Finished collection {} after {} pages", root, pages);
}

/// Fetch, render, extract and emit one page; returns the page to follow
async fn process_collection_page(context: &CrawlContext, url: &Url) -> Result<Option<Url>> {
    let page = context.fetcher.fetch(url).await?;
    let html = context.renderer.render_fully(&page.final_url).await?;
    context.stats.page_rendered();

    let result = {
        let mut visited = lock(&context.visited);
        context
            .processor
            .process(&page.final_url, &html, &mut visited)
    };

    if !result.products.is_empty() {
        let mut sink = lock(&context.sink);
        for (written, record) in result.products.iter().enumerate() {
            if let Err(e) = sink.write(record) {
                context.stats.products_emitted(written as u64);
                for dropped in &result.products[written..] {
                    tracing::error!(
                        "Dropped product {} from {}: {}",
                        dropped.product_url,
                        page.final_url,
                        e
                    );
                }
                return Err(e.into());
            }
        }
        context.stats.products_emitted(result.products.len() as u64);
    }

    tracing::debug!(
        "{} new products on {}",
        result.products.len(),
        page.final_url
    );

    Ok(result.next_page.filter(|next| {
        let allowed = context.is_allowed(next);
        if !allowed {
            tracing::debug!("Off-domain next page ignored: {}", next);
        }
        allowed
    }))
}

//! Collection page processing
//!
//! Turns a fully rendered collection page into product records and at most
//! one follow-up page, passing every URL through the visited sets first.

use crate::config::KeywordConfig;
use crate::crawler::parser::{document_base, resolve_link};
use crate::output::ProductRecord;
use crate::state::VisitedSets;
use crate::url::extract_authority;
use crate::ConfigError;
use scraper::{Html, Selector};
use url::Url;

/// What one collection page yielded
#[derive(Debug, Default)]
pub struct CollectionPage {
    /// Products not seen before, in document order
    pub products: Vec<ProductRecord>,
    /// Next page of the same collection, if any and not yet visited
    pub next_page: Option<Url>,
}

/// Selectors compiled once from the keyword configuration
#[derive(Debug)]
pub struct CollectionProcessor {
    products: Selector,
    next_label: Selector,
    next_rel: Selector,
    anchors: Selector,
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::Validation(format!("invalid selector '{}': {:?}", selector, e)))
}

impl CollectionProcessor {
    pub fn new(keywords: &KeywordConfig) -> Result<Self, ConfigError> {
        let products = keywords
            .product
            .iter()
            .map(|keyword| format!(r#"a[href*="/{}/"]"#, keyword))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            products: compile(&products)?,
            next_label: compile(r#"a[aria-label="Next page"][href]"#)?,
            next_rel: compile(r#"a[rel="next"][href]"#)?,
            anchors: compile("a[href]")?,
        })
    }

    /// Extracts new products and the unvisited next page
    ///
    /// `collection_url` is the URL the page was served from; records are
    /// attributed to its authority regardless of where product links point.
    pub fn process(
        &self,
        collection_url: &Url,
        html: &str,
        visited: &mut VisitedSets,
    ) -> CollectionPage {
        let document = Html::parse_document(html);
        let base = document_base(&document, collection_url);
        let domain = extract_authority(collection_url).unwrap_or_default();

        let mut page = CollectionPage::default();

        for href in document
            .select(&self.products)
            .filter_map(|element| element.value().attr("href"))
        {
            let Some(product_url) = resolve_link(href, &base) else {
                continue;
            };

            if visited.products.mark_and_check(product_url.as_str()) {
                page.products.push(ProductRecord {
                    domain: domain.clone(),
                    product_url: product_url.into(),
                });
            } else {
                tracing::trace!("Product already emitted: {}", product_url);
            }
        }

        if let Some(next) = self.next_page_href(&document) {
            match resolve_link(next, &base) {
                Some(next_url) if visited.collections.mark_and_check(next_url.as_str()) => {
                    page.next_page = Some(next_url);
                }
                Some(next_url) => {
                    tracing::debug!(
                        "Next page {} already visited, ending chain at {}",
                        next_url,
                        collection_url
                    );
                }
                None => {
                    tracing::debug!("Ignoring unusable next link '{}' on {}", next, collection_url);
                }
            }
        }

        page
    }

    /// First candidate wins: "Next page" label, then rel=next, then text
    fn next_page_href<'a>(&self, document: &'a Html) -> Option<&'a str> {
        let by_label = document.select(&self.next_label).next();
        let by_rel = || document.select(&self.next_rel).next();
        let by_text = || {
            document
                .select(&self.anchors)
                .find(|anchor| anchor.text().collect::<String>().trim() == "Next")
        };

        by_label
            .or_else(by_rel)
            .or_else(by_text)
            .and_then(|element| element.value().attr("href"))
    }
}

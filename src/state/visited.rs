//! Visited-URL tracking
//!
//! Both sets only ever grow. Membership is exact string equality on the
//! already-joined absolute URL; no further normalization is applied.

use std::collections::HashSet;

/// An append-only set of absolute URL strings
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-set: records `url` and returns true only if it was not
    /// already present. Returns false without mutating otherwise.
    ///
    /// This is the only dedup gate in the crawler; every newly discovered
    /// URL passes through it before a fetch is scheduled or a record emitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use ecommerce_crawler::state::VisitedSet;
    ///
    /// let mut set = VisitedSet::new();
    /// assert!(set.mark_and_check("https://shop.example.com/collections/all"));
    /// assert!(!set.mark_and_check("https://shop.example.com/collections/all"));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn mark_and_check(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// The two visited sets shared by every traversal branch
#[derive(Debug, Clone, Default)]
pub struct VisitedSets {
    /// Collection pages (roots and paginated continuations) already scheduled
    pub collections: VisitedSet,

    /// Product URLs already emitted
    pub products: VisitedSet,
}

impl VisitedSets {
    pub fn new() -> Self {
        Self::default()
    }
}

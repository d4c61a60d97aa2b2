//! Traversal phase definitions
//!
//! A crawl moves every seed through these phases. Paginating repeats for
//! each page of a chain; a branch ends when no further page is scheduled.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Building entry points from the configured domains
    Seeding,

    /// Harvesting collection links from an entry page
    Discovering,

    /// Rendering a collection page and following its next link
    Paginating,
}

impl CrawlPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Discovering => "discovering",
            Self::Paginating => "paginating",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::Seeding.to_string(), "seeding");
        assert_eq!(CrawlPhase::Discovering.to_string(), "discovering");
        assert_eq!(CrawlPhase::Paginating.to_string(), "paginating");
    }
}

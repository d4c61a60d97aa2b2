//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet` / `VisitedSets`: append-only dedup gates for collection and product URLs
//! - `CrawlPhase`: the traversal phase a page is handled in
//! - `CrawlStats`: live counters shared by concurrent pagination chains

mod counters;
mod phase;
mod visited;

// Re-export main types
pub use counters::CrawlStats;
pub use phase::CrawlPhase;
pub use visited::{VisitedSet, VisitedSets};

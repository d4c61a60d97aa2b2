//! Dynamic page rendering
//!
//! This module contains everything that touches the headless browser:
//! - The `BrowserSession` seam (navigate, run a script, read the DOM)
//! - `ChromeSession`, the Chromium implementation of that seam
//! - `Renderer`, which owns the single shared session and drives a page to
//!   full content with the scroll-to-stable loop

mod chrome;
mod renderer;

#[cfg(test)]
pub(crate) mod testing;

pub use chrome::ChromeSession;
pub use renderer::{Renderer, ScrollSettings, SCROLL_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("failed to read page source: {0}")]
    PageSource(String),

    #[error("failed to shut down browser: {0}")]
    Shutdown(String),

    #[error("script returned an unexpected value: {0}")]
    UnexpectedValue(String),

    #[error("browser session already closed")]
    Closed,
}

/// Step of a render that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Navigate,
    Measure,
    Scroll,
    Snapshot,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Navigate => "navigate",
            Self::Measure => "measure",
            Self::Scroll => "scroll",
            Self::Snapshot => "snapshot",
        };
        f.write_str(name)
    }
}

/// A single browser tab the crawler can drive
///
/// Implementations hold mutable browser state, so callers get exclusive
/// access through `&mut self`. The `Renderer` serializes all use.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates the tab to `url` and waits for the load to finish
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Evaluates a JavaScript expression and returns its JSON value
    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, BrowserError>;

    /// Returns the current serialized DOM
    async fn page_source(&mut self) -> Result<String, BrowserError>;

    /// Releases the browser
    async fn close(&mut self) -> Result<(), BrowserError>;
}

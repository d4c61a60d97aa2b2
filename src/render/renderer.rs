//! Scroll-to-stable renderer
//!
//! Infinite-scroll listings only load their full product grid after the
//! viewport has reached the bottom, possibly several times. The renderer
//! scrolls until the document height stops growing and then snapshots the
//! DOM.

use crate::config::BrowserConfig;
use crate::render::{BrowserError, BrowserSession, RenderPhase};
use crate::CrawlerError;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Expression returning the current document height
pub const SCROLL_HEIGHT_SCRIPT: &str = "document.body.scrollHeight";

/// Expression scrolling the viewport to the bottom of the document
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// Timing and bounds for the scroll loop
#[derive(Debug, Clone)]
pub struct ScrollSettings {
    /// Wait between navigation and the first height measurement
    pub settle_delay: Duration,

    /// Wait after each scroll before measuring again
    pub scroll_delay: Duration,

    /// Maximum scroll actions per page
    pub max_scroll_iterations: u32,
}

impl From<&BrowserConfig> for ScrollSettings {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            scroll_delay: Duration::from_millis(config.scroll_delay_ms),
            max_scroll_iterations: config.max_scroll_iterations,
        }
    }
}

/// Owner of the one browser session shared by all pagination chains
///
/// Only one page is ever mid-render: the session sits behind an async
/// mutex that is held for the whole render, including every wait inside
/// the scroll loop.
pub struct Renderer {
    session: Mutex<Option<Box<dyn BrowserSession>>>,
    settings: ScrollSettings,
}

impl Renderer {
    pub fn new(session: Box<dyn BrowserSession>, settings: ScrollSettings) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            settings,
        }
    }

    /// Navigates to `url`, scrolls until the height is stable and returns
    /// the rendered HTML
    ///
    /// # Loop
    ///
    /// 1. Navigate, then wait the settle delay
    /// 2. Measure the document height
    /// 3. Scroll to the bottom, wait the scroll delay, measure again
    /// 4. Stop once a measurement is not larger than the previous one, or
    ///    after `max_scroll_iterations` scrolls
    ///
    /// # Errors
    ///
    /// Any browser failure is returned as `CrawlerError::Render` carrying
    /// the URL and the step that failed.
    pub async fn render_fully(&self, url: &Url) -> Result<String, CrawlerError> {
        let mut guard = self.session.lock().await;
        let session = guard
            .as_mut()
            .ok_or_else(|| render_error(url, RenderPhase::Navigate, BrowserError::Closed))?;

        session
            .navigate(url.as_str())
            .await
            .map_err(|e| render_error(url, RenderPhase::Navigate, e))?;

        pause(self.settings.settle_delay).await;

        let mut last_height = measure_height(session.as_mut(), url).await?;
        let mut scrolls = 0u32;

        loop {
            if scrolls >= self.settings.max_scroll_iterations {
                tracing::warn!(
                    "Scroll bound of {} reached for {} (height still growing at {})",
                    self.settings.max_scroll_iterations,
                    url,
                    last_height
                );
                break;
            }

            session
                .execute_script(SCROLL_TO_BOTTOM_SCRIPT)
                .await
                .map_err(|e| render_error(url, RenderPhase::Scroll, e))?;
            scrolls += 1;

            pause(self.settings.scroll_delay).await;

            let new_height = measure_height(session.as_mut(), url).await?;
            if new_height <= last_height {
                break;
            }
            last_height = new_height;
        }

        tracing::debug!(
            "Rendered {} after {} scrolls (height {})",
            url,
            scrolls,
            last_height
        );

        session
            .page_source()
            .await
            .map_err(|e| render_error(url, RenderPhase::Snapshot, e))
    }

    /// Closes the browser session
    ///
    /// The session is released at most once: the first call closes it and
    /// returns `Ok(true)`, later calls return `Ok(false)`. Renders after
    /// shutdown fail with `BrowserError::Closed`.
    pub async fn shutdown(&self) -> Result<bool, BrowserError> {
        let session = self.session.lock().await.take();
        match session {
            Some(mut session) => {
                session.close().await?;
                tracing::info!("Browser session closed");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn render_error(url: &Url, phase: RenderPhase, source: BrowserError) -> CrawlerError {
    CrawlerError::Render {
        url: url.to_string(),
        phase,
        source,
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

async fn measure_height(session: &mut dyn BrowserSession, url: &Url) -> Result<u64, CrawlerError> {
    let value = session
        .execute_script(SCROLL_HEIGHT_SCRIPT)
        .await
        .map_err(|e| render_error(url, RenderPhase::Measure, e))?;

    value
        .as_f64()
        .filter(|height| *height >= 0.0)
        .map(|height| height as u64)
        .ok_or_else(|| {
            render_error(
                url,
                RenderPhase::Measure,
                BrowserError::UnexpectedValue(value.to_string()),
            )
        })
}

//! Chromium-backed browser session
//!
//! Launches one headless Chromium process over the DevTools protocol and
//! keeps a single tab open for the lifetime of the crawl.

use crate::config::BrowserConfig;
use crate::render::{BrowserError, BrowserSession};
use async_trait::async_trait;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

/// A headless Chromium instance with one open tab
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launches Chromium and opens a blank tab
    ///
    /// The browser runs without a display surface (unless `headless` is
    /// off), with GPU disabled and a fixed window and viewport size.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Launch` if no browser binary is found, the
    /// process fails to start, or the first tab cannot be opened.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let mut builder = chromiumoxide::BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .viewport(Viewport {
                width: config.window_width,
                height: config.window_height,
                ..Viewport::default()
            })
            .arg("--disable-gpu");

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::Launch(format!("failed to open tab: {}", e)));
            }
        };

        tracing::info!(
            "Launched Chromium ({}x{}, headless: {})",
            config.window_width,
            config.window_height,
            config.headless
        );

        Ok(Self {
            browser,
            page,
            handler,
        })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, BrowserError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::PageSource(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        let result = self
            .browser
            .close()
            .await
            .map_err(|e| BrowserError::Shutdown(e.to_string()));

        if result.is_ok() {
            if let Err(e) = self.browser.wait().await {
                tracing::warn!("Browser process did not exit cleanly: {}", e);
            }
        }

        self.handler.abort();
        result.map(|_| ())
    }
}

//! Scripted browser session for unit tests

use crate::render::{BrowserError, BrowserSession, SCROLL_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub(crate) struct SessionLog {
    pub navigations: Vec<String>,
    pub scrolls: usize,
    pub measurements: usize,
    pub closes: usize,
}

/// Serves canned HTML per URL and a scripted height sequence
pub(crate) struct ScriptedSession {
    log: Arc<Mutex<SessionLog>>,
    pages: HashMap<String, String>,
    heights: VecDeque<Value>,
    last_height: Value,
    failing: HashSet<String>,
    current: Option<String>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(SessionLog::default())),
            pages: HashMap::new(),
            heights: VecDeque::new(),
            last_height: Value::from(1000u64),
            failing: HashSet::new(),
            current: None,
        }
    }

    /// Heights returned by successive measurements; the last one repeats
    pub fn with_heights(mut self, heights: &[u64]) -> Self {
        self.heights = heights.iter().map(|h| Value::from(*h)).collect();
        self
    }

    pub fn with_height_value(mut self, value: Value) -> Self {
        self.heights = VecDeque::from(vec![value]);
        self
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn failing_navigation(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn log(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        if self.failing.contains(url) {
            return Err(BrowserError::Navigation(format!("{}: net::ERR_FAILED", url)));
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> Result<Value, BrowserError> {
        if script == SCROLL_TO_BOTTOM_SCRIPT {
            self.log.lock().unwrap().scrolls += 1;
            return Ok(Value::Null);
        }

        if script == SCROLL_HEIGHT_SCRIPT {
            self.log.lock().unwrap().measurements += 1;
            if let Some(height) = self.heights.pop_front() {
                self.last_height = height;
            }
            return Ok(self.last_height.clone());
        }

        Err(BrowserError::Script(format!("unexpected script: {}", script)))
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        let current = self.current.as_deref().unwrap_or_default();
        Ok(self
            .pages
            .get(current)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.log.lock().unwrap().closes += 1;
        Ok(())
    }
}

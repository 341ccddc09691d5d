// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use scraper::{Html, Selector};
use sirenrs::engines::traits::{DirectoryBrowser, DirectoryPage, EngineError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted stand-in for a rendered directory tab.
///
/// Holds a fixed sequence of page snapshots; `click` on the next
/// control advances through them exactly like server-side pagination
/// would. Selector checks run against real parsed HTML so the
/// fixtures exercise the same markup contract as production pages.
pub struct FakePage {
    pages: Vec<String>,
    cursor: AtomicUsize,
    closed: AtomicBool,
    visited_urls: Mutex<Vec<String>>,
    /// Artificial latency per suspension point, for cancellation tests.
    step_delay: Duration,
}

impl FakePage {
    pub fn new(pages: Vec<String>, step_delay: Duration) -> Self {
        Self {
            pages,
            cursor: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            visited_urls: Mutex::new(Vec::new()),
            step_delay,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn visited_urls(&self) -> Vec<String> {
        self.visited_urls.lock().clone()
    }

    fn current_html(&self) -> String {
        let idx = self.cursor.load(Ordering::SeqCst).min(self.pages.len() - 1);
        self.pages[idx].clone()
    }

    fn matches(&self, selector: &str) -> bool {
        let document = Html::parse_document(&self.current_html());
        match Selector::parse(selector) {
            Ok(sel) => document.select(&sel).next().is_some(),
            Err(_) => false,
        }
    }

    async fn step(&self) {
        if !self.step_delay.is_zero() {
            tokio::time::sleep(self.step_delay).await;
        }
    }
}

#[async_trait]
impl DirectoryPage for FakePage {
    async fn goto(&self, url: &str) -> Result<(), EngineError> {
        self.step().await;
        self.visited_urls.lock().push(url.to_string());
        self.cursor.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn wait_for(&self, selector: &str) -> Result<(), EngineError> {
        self.step().await;
        if self.matches(selector) {
            Ok(())
        } else {
            Err(EngineError::NavigationTimeout(Duration::from_millis(1)))
        }
    }

    async fn exists(&self, selector: &str) -> bool {
        self.matches(selector)
    }

    async fn click(&self, selector: &str) -> Result<(), EngineError> {
        self.step().await;
        if !self.matches(selector) {
            return Err(EngineError::Browser(format!(
                "no element matches {}",
                selector
            )));
        }
        self.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn html(&self) -> Result<String, EngineError> {
        self.step().await;
        Ok(self.current_html())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Browser stub handing out one scripted page per job.
pub struct FakeDirectory {
    pages: Vec<String>,
    step_delay: Duration,
    opened: Mutex<Vec<Arc<FakePage>>>,
}

impl FakeDirectory {
    pub fn new(pages: Vec<String>) -> Self {
        Self::with_delay(pages, Duration::ZERO)
    }

    pub fn with_delay(pages: Vec<String>, step_delay: Duration) -> Self {
        Self {
            pages,
            step_delay,
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Pages handed out so far, newest last.
    pub fn opened_pages(&self) -> Vec<Arc<FakePage>> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl DirectoryBrowser for FakeDirectory {
    async fn open_page(&self) -> Result<Arc<dyn DirectoryPage>, EngineError> {
        let page = Arc::new(FakePage::new(self.pages.clone(), self.step_delay));
        self.opened.lock().push(page.clone());
        Ok(page)
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::politeness::PolitenessPolicy;
use crate::engines::traits::{DirectoryBrowser, DirectoryPage, EngineError};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

// Global browser instance to avoid re-launching Chrome for every job.
// Pages are per-job and exclusively owned; only the process is shared.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

// Asynchronously gets or initializes the shared browser instance.
// This function ensures that the browser is launched only once.
async fn get_browser() -> Result<&'static Browser, EngineError> {
    BROWSER_INSTANCE
        .get_or_try_init(|| async {
            let remote_debugging_url = std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok();

            let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
                tracing::info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url).await.map_err(|e| {
                    EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?
            } else {
                let mut builder = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(30));

                // Production environment setup
                builder = builder.arg("--disable-gpu").arg("--disable-dev-shm-usage");

                Browser::launch(
                    builder
                        .build()
                        .map_err(|e| EngineError::Browser(e.to_string()))?,
                )
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))?
            };

            // Spawn a handler to process browser events
            tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(browser)
        })
        .await
}

/// Chromium浏览器引擎
///
/// 基于chromiumoxide的目录浏览器实现。浏览器进程全局
/// 共享，每个任务拿到自己独占的页面句柄。
pub struct ChromiumEngine {
    policy: PolitenessPolicy,
}

impl ChromiumEngine {
    /// 创建新的Chromium引擎实例
    ///
    /// # 参数
    ///
    /// * `policy` - 礼貌策略，提供导航超时和客户端标识
    pub fn new(policy: PolitenessPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl DirectoryBrowser for ChromiumEngine {
    async fn open_page(&self) -> Result<Arc<dyn DirectoryPage>, EngineError> {
        let browser = get_browser().await?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        page.set_user_agent(self.policy.user_agent())
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        Ok(Arc::new(ChromiumPage {
            page,
            nav_timeout: self.policy.navigation_timeout(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Chromium页面句柄
///
/// 把chromiumoxide的Page包装成提取循环需要的挂起点接口，
/// 每个导航类调用都在礼貌策略的超时预算内执行。
pub struct ChromiumPage {
    page: Page,
    nav_timeout: Duration,
    closed: AtomicBool,
}

#[async_trait]
impl DirectoryPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), EngineError> {
        // goto waits for the load event by default
        tokio::time::timeout(self.nav_timeout, self.page.goto(url))
            .await
            .map_err(|_| EngineError::NavigationTimeout(self.nav_timeout))?
            .map_err(|e| EngineError::Browser(e.to_string()))?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str) -> Result<(), EngineError> {
        // chromiumoxide has no built-in wait-for-selector, so poll within the budget
        let deadline = tokio::time::Instant::now() + self.nav_timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(EngineError::NavigationTimeout(self.nav_timeout));
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }

    async fn exists(&self, selector: &str) -> bool {
        self.page.find_element(selector).await.is_ok()
    }

    async fn click(&self, selector: &str) -> Result<(), EngineError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| EngineError::Browser(format!("Click failed, element not found: {}", e)))?
            .click()
            .await
            .map_err(|e| EngineError::Browser(format!("Click failed: {}", e)))?;
        Ok(())
    }

    async fn html(&self) -> Result<String, EngineError> {
        self.page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }

    async fn close(&self) {
        // Idempotent: stop() and the background task may both reach here
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.page.clone().close().await {
            tracing::warn!("Failed to close browser page: {}", e);
        }
    }
}

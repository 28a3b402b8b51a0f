// src/fetch/browser.rs

//! Shared headless Chromium session backing [`RenderedFetch`](super::RenderedFetch).

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::PageRenderer;
use crate::error::{AppError, BoxError, Result};
use crate::models::{BrowserSettings, Settings};

/// Interval between checks for a wait selector.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One launched Chromium process, opened in a new tab per render.
pub struct BrowserClient {
    browser: RwLock<Option<Browser>>,
    handler: StdMutex<Option<JoinHandle<()>>>,
    timeout: Duration,
    settle_delay: Duration,
}

impl BrowserClient {
    /// Launch Chromium and start driving its DevTools connection.
    pub async fn launch(settings: &BrowserSettings, timeout: Duration) -> Result<Self> {
        let mut builder = BrowserConfig::builder().request_timeout(timeout);
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(AppError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::Browser(format!("launch failed: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log::debug!("browser event error: {e}");
                }
            }
        });

        log::info!(
            "Browser session started (headless: {})",
            settings.headless
        );

        Ok(Self {
            browser: RwLock::new(Some(browser)),
            handler: StdMutex::new(Some(handler)),
            timeout,
            settle_delay: settings.settle_delay(),
        })
    }

    async fn load(
        &self,
        page: &Page,
        url: &str,
        wait_for: Option<&str>,
    ) -> std::result::Result<String, BoxError> {
        tokio::time::timeout(self.timeout, page.goto(url))
            .await
            .map_err(|_| format!("navigation timed out after {:?}", self.timeout))??;

        match wait_for {
            Some(selector) => {
                tokio::time::timeout(self.timeout, wait_for_selector(page, selector))
                    .await
                    .map_err(|_| format!("timed out waiting for '{selector}'"))?;
            }
            None => tokio::time::sleep(self.settle_delay).await,
        }

        Ok(page.content().await?)
    }
}

async fn wait_for_selector(page: &Page, selector: &str) {
    while page.find_element(selector).await.is_err() {
        tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
    }
}

#[async_trait]
impl PageRenderer for BrowserClient {
    async fn render(
        &self,
        url: &str,
        wait_for: Option<&str>,
    ) -> std::result::Result<String, BoxError> {
        // Tabs open under a shared guard; only shutdown takes the browser.
        let page = {
            let guard = self.browser.read().await;
            let browser = guard.as_ref().ok_or("browser session is closed")?;
            browser.new_page("about:blank").await?
        };

        let outcome = self.load(&page, url, wait_for).await;
        if let Err(e) = page.close().await {
            log::debug!("failed to close tab for {url}: {e}");
        }
        outcome
    }

    async fn shutdown(&self) -> Result<()> {
        let Some(mut browser) = self.browser.write().await.take() else {
            return Ok(());
        };

        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            log::debug!("browser process wait failed: {e}");
        }
        let handler = self.handler.lock().ok().and_then(|mut h| h.take());
        if let Some(handler) = handler {
            handler.abort();
        }

        closed
            .map(|_| log::info!("Browser session closed"))
            .map_err(|e| AppError::Browser(format!("close failed: {e}")))
    }
}

/// Provisions the shared browser session for a run.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, settings: &Settings) -> Result<Arc<dyn PageRenderer>>;
}

/// Launches a local Chromium through DevTools.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromiumLauncher;

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, settings: &Settings) -> Result<Arc<dyn PageRenderer>> {
        let client =
            BrowserClient::launch(&settings.browser, settings.crawler.request_timeout()).await?;
        Ok(Arc::new(client))
    }
}

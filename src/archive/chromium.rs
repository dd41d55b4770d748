// src/archive/chromium.rs
// =============================================================================
// Headless Chromium backend (cargo feature `chromium`).
//
// Unlike the HTTP backend this runs the page's JavaScript, so the snapshot is
// what a reader would actually have seen. The CDP event handler must be
// polled for the browser to make progress, so it runs on its own task for
// the lifetime of the browser.
// =============================================================================

use crate::archive::browser::{Browser, Launcher, Page};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher;

#[async_trait]
impl Launcher for ChromiumLauncher {
    type Browser = ChromiumBrowser;

    async fn launch(&self) -> Result<ChromiumBrowser> {
        let config = BrowserConfig::builder().build().map_err(Error::Launch)?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(ChromiumBrowser { browser, handler })
    }
}

pub struct ChromiumBrowser {
    browser: CdpBrowser,
    handler: JoinHandle<()>,
}

#[async_trait]
impl Browser for ChromiumBrowser {
    type Page = ChromiumPage;

    async fn new_page(&self) -> Result<ChromiumPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(Error::page_open)?;

        Ok(ChromiumPage {
            page: Some(page),
            url: String::new(),
        })
    }

    async fn close(&mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}

pub struct ChromiumPage {
    page: Option<chromiumoxide::Page>,
    url: String,
}

impl ChromiumPage {
    fn page(&self) -> Result<&chromiumoxide::Page> {
        self.page.as_ref().ok_or_else(|| Error::Capture {
            url: self.url.clone(),
            reason: "page already closed".to_string(),
        })
    }
}

#[async_trait]
impl Page for ChromiumPage {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.url = url.to_string();
        let page = self.page()?;

        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(Error::Timeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }

    async fn content(&mut self) -> Result<String> {
        let page = self.page()?;
        page.content().await.map_err(|e| Error::Capture {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            page.close().await.map_err(|e| Error::Capture {
                url: self.url.clone(),
                reason: format!("close failed: {}", e),
            })?;
        }
        Ok(())
    }
}

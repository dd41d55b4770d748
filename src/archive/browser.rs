// src/archive/browser.rs
// =============================================================================
// The page capture capability used by the scheduler.
//
// The scheduler only needs five things: launch a browser, open a page,
// navigate with a deadline, read the rendered markup, and close things again.
// Those are the three traits below. Keeping the surface this small lets tests
// swap in a fake browser without touching the network.
//
// Default backend: `HttpLauncher`, which captures the raw HTTP response body
// with reqwest (no JavaScript). Build with `--features chromium` for a real
// headless browser (see chromium.rs).
// =============================================================================

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

// Starts the shared browser. A failure here aborts the whole run.
#[async_trait]
pub trait Launcher: Send + Sync {
    type Browser: Browser;

    async fn launch(&self) -> Result<Self::Browser>;
}

// One running browser, shared by reference between concurrent tasks.
// Every task gets its own page; pages are never shared.
#[async_trait]
pub trait Browser: Send + Sync {
    type Page: Page;

    async fn new_page(&self) -> Result<Self::Page>;

    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
pub trait Page: Send {
    // Navigates and waits until the backend considers the page loaded: the
    // full response body for HTTP, the load event for Chromium. Fails after
    // `timeout`. Neither backend waits for the network to go idle.
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()>;

    // Fully rendered markup of the current page.
    async fn content(&mut self) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}

/// Launches the plain-HTTP capture backend
#[derive(Debug, Clone)]
pub struct HttpLauncher {
    user_agent: String,
}

impl HttpLauncher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl Launcher for HttpLauncher {
    type Browser = HttpBrowser;

    async fn launch(&self) -> Result<HttpBrowser> {
        // One client for the whole run so connections are pooled
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Launch(e.to_string()))?;

        Ok(HttpBrowser { client })
    }
}

#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
}

#[async_trait]
impl Browser for HttpBrowser {
    type Page = HttpPage;

    async fn new_page(&self) -> Result<HttpPage> {
        // Client is reference counted, cloning is cheap
        Ok(HttpPage {
            client: self.client.clone(),
            url: String::new(),
            body: None,
        })
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    url: String,
    body: Option<String>,
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.url = url.to_string();
        self.body = None;

        Url::parse(url).map_err(|e| Error::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| categorize_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Navigation {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| categorize_error(url, timeout, e))?;
        self.body = Some(body);
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        self.body.clone().ok_or_else(|| Error::Capture {
            url: self.url.clone(),
            reason: "no page has been loaded".to_string(),
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.body = None;
        Ok(())
    }
}

// Maps reqwest failures onto the per-link error variants
fn categorize_error(url: &str, timeout: Duration, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else if error.is_connect() || error.is_redirect() || error.is_request() {
        Error::Navigation {
            url: url.to_string(),
            reason: error.to_string(),
        }
    } else {
        Error::Http(error)
    }
}

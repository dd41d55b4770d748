// src/archive/testing.rs
// =============================================================================
// In-memory browser used by the scheduler tests.
//
// Records every navigation and page open/close so tests can assert on
// idempotency, cleanup and the concurrency bound without any network access.
// =============================================================================

use crate::archive::browser::{Browser, Launcher, Page};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PAGE_LOAD: Duration = Duration::from_millis(10);
const SLOW_PAGE_LOAD: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
pub struct FakeState {
    navigations: Mutex<Vec<String>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    browser_closed: AtomicBool,
}

impl FakeState {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn pages_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn browser_closed(&self) -> bool {
        self.browser_closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
struct Behaviour {
    failing: HashSet<String>,
    slow: HashSet<String>,
    hang_new_page: bool,
}

#[derive(Debug, Default)]
pub struct FakeLauncher {
    pub state: Arc<FakeState>,
    behaviour: Behaviour,
    fail_launch: bool,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    // Navigation to this URL returns an error
    pub fn with_failing(mut self, url: &str) -> Self {
        self.behaviour.failing.insert(url.to_string());
        self
    }

    // Navigation to this URL never settles in time
    pub fn with_slow(mut self, url: &str) -> Self {
        self.behaviour.slow.insert(url.to_string());
        self
    }

    // new_page() never returns, as with a browser that stopped responding
    pub fn with_hanging_pages(mut self) -> Self {
        self.behaviour.hang_new_page = true;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn page_markup(url: &str) -> String {
        format!("<html><body>{}</body></html>", url)
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Browser = FakeBrowser;

    async fn launch(&self) -> Result<FakeBrowser> {
        if self.fail_launch {
            return Err(Error::Launch("fake browser refused to start".into()));
        }
        Ok(FakeBrowser {
            state: Arc::clone(&self.state),
            behaviour: self.behaviour.clone(),
        })
    }
}

pub struct FakeBrowser {
    state: Arc<FakeState>,
    behaviour: Behaviour,
}

#[async_trait]
impl Browser for FakeBrowser {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage> {
        if self.behaviour.hang_new_page {
            futures::future::pending::<()>().await;
        }

        self.state.opened.fetch_add(1, Ordering::SeqCst);
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);

        Ok(FakePage {
            state: Arc::clone(&self.state),
            behaviour: self.behaviour.clone(),
            loaded: None,
            open: true,
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.state.browser_closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    state: Arc<FakeState>,
    behaviour: Behaviour,
    loaded: Option<String>,
    open: bool,
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        self.state.navigations.lock().unwrap().push(url.to_string());

        if self.behaviour.failing.contains(url) {
            return Err(Error::Navigation {
                url: url.to_string(),
                reason: "connection refused".into(),
            });
        }

        let delay = if self.behaviour.slow.contains(url) {
            SLOW_PAGE_LOAD
        } else {
            PAGE_LOAD
        };
        tokio::time::sleep(delay).await;

        self.loaded = Some(url.to_string());
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        match &self.loaded {
            Some(url) => Ok(FakeLauncher::page_markup(url)),
            None => Err(Error::Capture {
                url: String::new(),
                reason: "nothing loaded".into(),
            }),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.state.closed.fetch_add(1, Ordering::SeqCst);
            self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// src/archive/scheduler.rs
// =============================================================================
// Batch scheduler that turns a list of links into snapshots.
//
// How it works:
// 1. Launch the browser once (failure here is the only fatal error)
// 2. Split the links into batches of `concurrency`
// 3. Run batches one after another; inside a batch every link runs at once
// 4. Per link: skip if the snapshot exists, else open a page, navigate,
//    capture, close the page, write the snapshot
// 5. Close the browser and report how many links were considered
//
// A failing link is logged and counted, never propagated. It is not retried
// during this run; the next run retries it because its snapshot is still
// missing.
// =============================================================================

use crate::archive::browser::{Browser, Launcher, Page};
use crate::archive::store::ArchiveStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fingerprint::fingerprint;
use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// What happened to a single link during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    /// A new snapshot was written
    Archived,
    /// A snapshot already existed, nothing was fetched
    Skipped,
    /// Navigation, timeout, capture or write failed
    Failed,
}

/// Totals for one archive run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Every link handed to the scheduler, whatever its outcome
    pub considered: usize,
    pub archived: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ArchiveReport {
    fn record(&mut self, outcome: LinkOutcome) {
        self.considered += 1;
        match outcome {
            LinkOutcome::Archived => self.archived += 1,
            LinkOutcome::Skipped => self.skipped += 1,
            LinkOutcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Archiver {
    store: ArchiveStore,
    concurrency: usize,
    page_timeout: Duration,
}

impl Archiver {
    pub fn new(store: ArchiveStore, concurrency: usize, page_timeout: Duration) -> Result<Self> {
        if concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        Ok(Self {
            store,
            concurrency,
            page_timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(
            ArchiveStore::new(&config.archive_dir),
            config.concurrency,
            config.page_timeout(),
        )
    }

    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    // Full run: launch, archive every link, close.
    //
    // Returns Err only when the browser cannot be launched; in that case no
    // link has been touched.
    pub async fn run<L: Launcher>(&self, launcher: &L, links: &[String]) -> Result<ArchiveReport> {
        let mut browser = launcher.launch().await?;
        info!(
            links = links.len(),
            concurrency = self.concurrency,
            "browser launched, archiving"
        );

        let report = self.archive_with(&browser, links).await;

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser: {}", e);
        }

        info!(
            considered = report.considered,
            archived = report.archived,
            skipped = report.skipped,
            failed = report.failed,
            "archive run finished"
        );
        Ok(report)
    }

    // Archives links with an already running browser.
    pub async fn archive_with<B: Browser>(&self, browser: &B, links: &[String]) -> ArchiveReport {
        let mut report = ArchiveReport::default();

        for (index, batch) in links.chunks(self.concurrency).enumerate() {
            debug!(batch = index + 1, size = batch.len(), "starting batch");

            // The whole batch must finish before the next one starts
            let outcomes = join_all(batch.iter().map(|url| self.archive_one(browser, url))).await;

            for outcome in outcomes {
                report.record(outcome);
            }
        }

        report
    }

    async fn archive_one<B: Browser>(&self, browser: &B, url: &str) -> LinkOutcome {
        let fp = fingerprint(url);

        if self.store.contains(&fp).await {
            debug!(%url, fingerprint = %fp, "snapshot exists, skipping");
            return LinkOutcome::Skipped;
        }

        let markup = match capture(browser, url, self.page_timeout).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(%url, error = %e, "capture failed");
                return LinkOutcome::Failed;
            }
        };

        match self.store.write(&fp, &markup).await {
            Ok(path) => {
                info!(%url, path = %path.display(), "snapshot archived");
                LinkOutcome::Archived
            }
            Err(e) => {
                warn!(%url, error = %e, "could not store snapshot");
                LinkOutcome::Failed
            }
        }
    }
}

// Opens a page, loads `url` and returns its markup.
//
// Opening the page, navigation and capture share one absolute deadline. A
// page that was obtained is closed on every path, including when the deadline
// fires mid-navigation.
async fn capture<B: Browser>(browser: &B, url: &str, timeout: Duration) -> Result<String> {
    let deadline = Instant::now() + timeout;

    let mut page = match tokio::time::timeout_at(deadline, browser.new_page()).await {
        Ok(page) => page?,
        Err(_) => return Err(timed_out(url, timeout)),
    };

    let captured = tokio::time::timeout_at(deadline, async {
        page.goto(url, timeout).await?;
        let markup = page.content().await?;
        Ok::<String, Error>(markup)
    })
    .await;

    if let Err(e) = page.close().await {
        debug!(%url, error = %e, "page close failed");
    }

    match captured {
        Ok(result) => result,
        Err(_) => Err(timed_out(url, timeout)),
    }
}

fn timed_out(url: &str, timeout: Duration) -> Error {
    Error::Timeout {
        url: url.to_string(),
        timeout,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why chunks() + join_all instead of buffer_unordered?
//    - buffer_unordered(N) starts a new task as soon as any task finishes
//    - Here a batch must fully finish before the next one starts
//    - links.chunks(N) gives the batches, join_all runs one batch at once
//
// 2. Why is `browser` passed as &B and not cloned?
//    - All tasks in a batch only need shared access to open pages
//    - join_all runs the futures on the current task, so borrowing is fine
//      (no 'static bound like tokio::spawn would need)
//
// 3. What does tokio::time::timeout_at return?
//    - Ok(inner_result) if the future finished before the deadline
//    - Err(Elapsed) if the deadline fired; the inner future is dropped
//    - Using one Instant for both steps means a slow new_page() leaves
//      less time for goto(), so the total never exceeds the page timeout
//
// 4. Why Ok::<String, Error>(markup)?
//    - An async block has no declared return type
//    - The turbofish tells the compiler which error type `?` converts into
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::testing::FakeLauncher;
    use std::collections::BTreeSet;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn links(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    fn archiver(dir: &tempfile::TempDir, concurrency: usize) -> Archiver {
        Archiver::new(ArchiveStore::new(dir.path()), concurrency, TIMEOUT).unwrap()
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = Archiver::new(ArchiveStore::new("unused"), 0, TIMEOUT);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_archives_every_link() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 2);
        let launcher = FakeLauncher::new();
        let urls = links(&["https://a.example", "https://b.example", "https://c.example"]);

        let report = archiver.run(&launcher, &urls).await.unwrap();

        assert_eq!(report.considered, 3);
        assert_eq!(report.archived, 3);
        for url in &urls {
            let stored = archiver.store().read(&fingerprint(url)).await.unwrap();
            assert_eq!(stored, Some(FakeLauncher::page_markup(url)));
        }
        assert!(launcher.state.browser_closed());
    }

    #[tokio::test]
    async fn test_second_run_performs_no_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 5);
        let urls = links(&["https://a.example", "https://b.example"]);

        let first = FakeLauncher::new();
        archiver.run(&first, &urls).await.unwrap();
        assert_eq!(first.state.navigations().len(), 2);

        let second = FakeLauncher::new();
        let report = archiver.run(&second, &urls).await.unwrap();

        assert!(second.state.navigations().is_empty());
        assert_eq!(second.state.pages_opened(), 0);
        assert_eq!(report.considered, 2);
        assert_eq!(report.skipped, 2);
    }

    #[tokio::test]
    async fn test_timeout_in_batch_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 5);
        let launcher = FakeLauncher::new().with_slow("https://slow.example");
        let urls = links(&[
            "https://a.example",
            "https://b.example",
            "https://slow.example",
            "https://c.example",
            "https://d.example",
        ]);

        let report = archiver.run(&launcher, &urls).await.unwrap();

        assert_eq!(report.considered, 5);
        assert_eq!(report.archived, 4);
        assert_eq!(report.failed, 1);
        assert!(!archiver.store().contains(&fingerprint("https://slow.example")).await);
        assert!(archiver.store().contains(&fingerprint("https://d.example")).await);
    }

    #[tokio::test]
    async fn test_navigation_error_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 2);
        let launcher = FakeLauncher::new().with_failing("https://down.example");
        let urls = links(&["https://down.example", "https://up.example"]);

        let report = archiver.run(&launcher, &urls).await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.archived, 1);
        assert_eq!(report.considered, 2);
    }

    #[tokio::test]
    async fn test_pages_closed_on_every_path() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 3);
        let launcher = FakeLauncher::new()
            .with_failing("https://down.example")
            .with_slow("https://slow.example");
        let urls = links(&["https://down.example", "https://slow.example", "https://ok.example"]);

        archiver.run(&launcher, &urls).await.unwrap();

        assert_eq!(launcher.state.pages_opened(), 3);
        assert_eq!(launcher.state.pages_closed(), 3);
    }

    #[tokio::test]
    async fn test_hanging_new_page_counts_as_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 2);
        let launcher = FakeLauncher::new().with_hanging_pages();
        let urls = links(&["https://a.example", "https://b.example", "https://c.example"]);

        // Each batch is bounded by TIMEOUT, so three links in two batches
        // finish well inside this guard
        let report = tokio::time::timeout(Duration::from_secs(3), archiver.run(&launcher, &urls))
            .await
            .expect("run blocked on a page that never opened")
            .unwrap();

        assert_eq!(report.considered, 3);
        assert_eq!(report.failed, 3);
        assert_eq!(launcher.state.pages_opened(), 0);
        assert!(launcher.state.browser_closed());
        assert!(!archiver.store().contains(&fingerprint("https://a.example")).await);
    }

    #[tokio::test]
    async fn test_launch_failure_aborts_before_any_page() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 2);
        let launcher = FakeLauncher::new().failing_launch();

        let result = archiver.run(&launcher, &links(&["https://a.example"])).await;

        assert!(matches!(result, Err(Error::Launch(_))));
        assert_eq!(launcher.state.pages_opened(), 0);
    }

    #[tokio::test]
    async fn test_pages_in_flight_never_exceed_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 3);
        let launcher = FakeLauncher::new();
        let urls: Vec<String> = (0..10).map(|i| format!("https://site{}.example", i)).collect();

        let report = archiver.run(&launcher, &urls).await.unwrap();

        assert_eq!(report.archived, 10);
        assert!(launcher.state.max_in_flight() <= 3);
    }

    #[tokio::test]
    async fn test_batches_run_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 1);
        let launcher = FakeLauncher::new();
        let urls = links(&["https://1.example", "https://2.example", "https://3.example"]);

        archiver.run(&launcher, &urls).await.unwrap();

        assert_eq!(launcher.state.navigations(), urls);
        assert_eq!(launcher.state.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_empty_link_set() {
        let dir = tempfile::tempdir().unwrap();
        let report = archiver(&dir, 4).run(&FakeLauncher::new(), &[]).await.unwrap();
        assert_eq!(report, ArchiveReport::default());
    }

    #[tokio::test]
    async fn test_runs_over_discovered_set() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = archiver(&dir, 2);
        let launcher = FakeLauncher::new();
        let set: BTreeSet<String> =
            crate::discover::discover(["[a](https://x.com) [b](/internal) [c](http://y.com)"]);
        let urls: Vec<String> = set.into_iter().collect();

        let report = archiver.run(&launcher, &urls).await.unwrap();

        assert_eq!(report.archived, 2);
        let navigated: BTreeSet<String> = launcher.state.navigations().into_iter().collect();
        assert!(navigated.contains("https://x.com"));
        assert!(navigated.contains("http://y.com"));
    }
}

// src/archive/mod.rs
// =============================================================================
// Archival pipeline: capture external pages and store them as snapshots.
//
// Submodules:
// - browser: the capture capability traits + plain HTTP backend
// - chromium: headless Chromium backend (feature "chromium")
// - scheduler: batched, idempotent archive runs
// - store: write-once snapshot files keyed by fingerprint
// =============================================================================

mod browser;
#[cfg(feature = "chromium")]
mod chromium;
mod scheduler;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{Browser, HttpBrowser, HttpLauncher, HttpPage, Launcher, Page};
#[cfg(feature = "chromium")]
pub use chromium::{ChromiumBrowser, ChromiumLauncher, ChromiumPage};
pub use scheduler::{ArchiveReport, Archiver, LinkOutcome};
pub use store::ArchiveStore;

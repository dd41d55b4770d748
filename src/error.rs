// src/error.rs
// =============================================================================
// Error type for the library half of the crate.
//
// Only `Launch` is allowed to stop an archive run. Every per-link variant
// (Navigation, Timeout, Capture, Http) is caught by the scheduler, logged and
// counted. The binary wraps these in anyhow for context and exit codes.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The shared browser capability could not be started
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// Navigation to a page failed (bad URL, DNS, non-2xx status, ...)
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page did not settle before its deadline
    #[error("timed out after {timeout:?} while capturing {url}")]
    Timeout { url: String, timeout: Duration },

    /// The page loaded but its markup could not be read
    #[error("failed to capture content of {url}: {reason}")]
    Capture { url: String, reason: String },

    /// Transport-level HTTP error from the default capture backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error while reading or writing the archive
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid settings (zero concurrency, unreadable config file, ...)
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    // A page handle could not be opened on a running browser. Only that link
    // is lost, so this is a capture failure, not a launch failure.
    #[cfg_attr(not(feature = "chromium"), allow(dead_code))]
    pub(crate) fn page_open(reason: impl std::fmt::Display) -> Self {
        Error::Capture {
            url: "about:blank".to_string(),
            reason: format!("could not open page: {}", reason),
        }
    }

    /// True for failures that only affect a single link
    pub fn is_per_link(&self) -> bool {
        matches!(
            self,
            Error::Navigation { .. } | Error::Timeout { .. } | Error::Capture { .. } | Error::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

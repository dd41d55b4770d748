// src/config.rs
// =============================================================================
// Runtime settings.
//
// Values are layered: built-in defaults, then an optional TOML file, then the
// command line (clap also reads LINK_ARCHIVER_* environment variables). Only
// the first two layers live here; main.rs applies the CLI overrides.
// =============================================================================

use crate::error::{Error, Result};
use crate::fingerprint::DEFAULT_ARCHIVE_PREFIX;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ARCHIVE_DIR: &str = "docs/public/archives";
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ICON: &str = "📦";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding one `<fingerprint>` file per snapshot
    pub archive_dir: PathBuf,
    /// How many links are captured at the same time
    pub concurrency: usize,
    /// Absolute deadline for one page (open + navigate + capture)
    pub page_timeout_secs: u64,
    /// Public URL prefix the archive directory is served under
    pub archive_url_prefix: String,
    /// Text of the snapshot link appended after external links
    pub icon: String,
    /// User-Agent sent by the HTTP capture backend
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            page_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            archive_url_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            icon: DEFAULT_ICON.to_string(),
            user_agent: concat!("link-archiver/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    // Reads a TOML file. Missing keys fall back to the defaults above.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| Error::Config(format!("bad config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        if self.page_timeout_secs == 0 {
            return Err(Error::Config("page timeout must be at least 1 second".into()));
        }
        Ok(())
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

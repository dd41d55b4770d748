// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Every option can also come from the environment (LINK_ARCHIVER_*), and the
// archive settings can come from a TOML file passed with --config. Flags win
// over the file, the file wins over built-in defaults.
// =============================================================================

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-archiver",
    version,
    about = "Snapshot the external links in your Markdown docs",
    long_about = "link-archiver finds every external link in a folder of Markdown files, saves a \
                  snapshot of each linked page, and renders Markdown with a small link to the \
                  snapshot next to every external link."
)]
pub struct Cli {
    /// TOML file with archive settings
    #[arg(long, global = true, env = "LINK_ARCHIVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture a snapshot of every external link that isn't archived yet
    ///
    /// Example: link-archiver archive docs/ --concurrency 8
    Archive {
        /// Folder of Markdown (*.md) files to scan
        docs_dir: PathBuf,

        /// Where snapshot files are written
        #[arg(long, env = "LINK_ARCHIVER_ARCHIVE_DIR")]
        archive_dir: Option<PathBuf>,

        /// Number of pages captured at the same time
        #[arg(long, env = "LINK_ARCHIVER_CONCURRENCY")]
        concurrency: Option<usize>,

        /// Per-page timeout in seconds
        #[arg(long, env = "LINK_ARCHIVER_TIMEOUT")]
        timeout: Option<u64>,

        /// How pages are captured
        #[arg(long, value_enum, default_value_t = BrowserKind::Http)]
        browser: BrowserKind,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List external links with their snapshot names and archive status
    Links {
        /// Folder of Markdown (*.md) files to scan
        docs_dir: PathBuf,

        /// Where snapshot files live
        #[arg(long, env = "LINK_ARCHIVER_ARCHIVE_DIR")]
        archive_dir: Option<PathBuf>,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render a Markdown file to HTML with snapshot links
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Public path the snapshots are served under
        #[arg(long, env = "LINK_ARCHIVER_URL_PREFIX")]
        archive_url_prefix: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserKind {
    /// Plain HTTP GET, no JavaScript
    Http,
    /// Headless Chromium (needs the "chromium" build feature)
    Chromium,
}

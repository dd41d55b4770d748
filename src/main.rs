// src/main.rs
// =============================================================================
// Entry point of the link-archiver CLI.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Build the effective Config (defaults < --config file < flags/env)
// 3. Dispatch to the subcommand handler
// 4. Exit with a proper code (0 = success, 1 = some links failed, 2 = error)
//
// The directory walk and all printing live here; the library only sees
// document texts and link lists.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{BrowserKind, Cli, Commands};
use link_archiver::archive::{ArchiveReport, Archiver, HttpLauncher, Launcher};
use link_archiver::discover::discover;
use link_archiver::render::{render_markdown, ArchiveLinks, HtmlRenderer};
use link_archiver::{fingerprint, Config};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Archive {
            docs_dir,
            archive_dir,
            concurrency,
            timeout,
            browser,
            json,
        } => {
            if let Some(dir) = archive_dir {
                config.archive_dir = dir;
            }
            if let Some(n) = concurrency {
                config.concurrency = n;
            }
            if let Some(secs) = timeout {
                config.page_timeout_secs = secs;
            }
            config.validate()?;
            handle_archive(&docs_dir, &config, browser, json).await
        }
        Commands::Links {
            docs_dir,
            archive_dir,
            json,
        } => {
            if let Some(dir) = archive_dir {
                config.archive_dir = dir;
            }
            handle_links(&docs_dir, &config, json).await
        }
        Commands::Render {
            file,
            archive_url_prefix,
        } => {
            if let Some(prefix) = archive_url_prefix {
                config.archive_url_prefix = prefix;
            }
            handle_render(&file, &config).await
        }
    }
}

// Logs go to stderr so stdout stays clean for JSON and HTML
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "link_archiver=debug"
    } else {
        "link_archiver=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn handle_archive(
    docs_dir: &Path,
    config: &Config,
    browser: BrowserKind,
    json: bool,
) -> Result<i32> {
    let documents = read_documents(docs_dir).await?;
    let links: Vec<String> = discover(documents.iter().map(|(_, text)| text))
        .into_iter()
        .collect();

    eprintln!(
        "🔍 {} external link(s) in {} file(s)",
        links.len(),
        documents.len()
    );

    let archiver = Archiver::from_config(config)?;
    let report = match browser {
        BrowserKind::Http => {
            run_archive(&archiver, &HttpLauncher::new(config.user_agent.as_str()), &links).await?
        }
        BrowserKind::Chromium => run_chromium(&archiver, &links).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(if report.failed > 0 { 1 } else { 0 })
}

async fn run_archive<L: Launcher>(
    archiver: &Archiver,
    launcher: &L,
    links: &[String],
) -> Result<ArchiveReport> {
    archiver
        .run(launcher, links)
        .await
        .context("archive run aborted")
}

#[cfg(feature = "chromium")]
async fn run_chromium(archiver: &Archiver, links: &[String]) -> Result<ArchiveReport> {
    run_archive(archiver, &link_archiver::archive::ChromiumLauncher, links).await
}

#[cfg(not(feature = "chromium"))]
async fn run_chromium(_archiver: &Archiver, _links: &[String]) -> Result<ArchiveReport> {
    anyhow::bail!("this build has no Chromium support; rebuild with `--features chromium`")
}

fn print_summary(report: &ArchiveReport) {
    println!("📊 Summary:");
    println!("   📦 Archived: {}", report.archived);
    println!("   ⏭️  Already archived: {}", report.skipped);
    println!("   ❌ Failed: {}", report.failed);
    println!("✅ Archive complete: {} link(s)", report.considered);
}

#[derive(Debug, Serialize)]
struct LinkEntry {
    url: String,
    fingerprint: String,
    archived: bool,
}

async fn handle_links(docs_dir: &Path, config: &Config, json: bool) -> Result<i32> {
    let documents = read_documents(docs_dir).await?;
    let store = link_archiver::archive::ArchiveStore::new(&config.archive_dir);

    let mut entries = Vec::new();
    for url in discover(documents.iter().map(|(_, text)| text)) {
        let fp = fingerprint(&url);
        let archived = store.contains(&fp).await;
        entries.push(LinkEntry {
            url,
            fingerprint: fp.to_string(),
            archived,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(0);
    }

    println!("{:<60} {:<10} {}", "URL", "ARCHIVED", "SNAPSHOT");
    println!("{}", "=".repeat(140));
    for entry in &entries {
        let url_display = if entry.url.chars().count() > 57 {
            format!("{}...", entry.url.chars().take(57).collect::<String>())
        } else {
            entry.url.clone()
        };
        let status = if entry.archived { "yes" } else { "no" };
        println!("{:<60} {:<10} {}", url_display, status, entry.fingerprint);
    }
    println!();
    println!(
        "📋 Total: {}, archived: {}",
        entries.len(),
        entries.iter().filter(|e| e.archived).count()
    );

    Ok(0)
}

async fn handle_render(file: &Path, config: &Config) -> Result<i32> {
    let markdown = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("could not read {}", file.display()))?;

    let renderer = ArchiveLinks::from_config(HtmlRenderer, config);
    print!("{}", render_markdown(&markdown, &renderer));
    Ok(0)
}

// Reads every *.md file directly inside `dir` (not recursive), sorted by
// name. Returns (path, contents) pairs.
async fn read_documents(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("could not open docs folder {}", dir.display()))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        documents.push((path, text));
    }

    Ok(documents)
}

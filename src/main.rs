//! # Hacker News Scraper
//!
//! Crawls the paginated front page of [The Hacker News](https://thehackernews.com/),
//! extracts every post's title, URL, description, author and thumbnail, and
//! stores them in a document store, a SQLite database or a JSON file.
//!
//! ## Usage
//!
//! ```sh
//! hackernews_scraper -p 3 -s file -t ./out/posts.json
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Crawling**: fetch the start page, then follow "older posts" links
//! 2. **Extraction**: turn each post element into a title and a detail record
//! 3. **Output**: hand both record lists to the selected sink

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::ScraperConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hackernews_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = ScraperConfig::resolve(&args).inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;
    info!(
        pages = config.page_count,
        sink = ?config.sink,
        start_url = %config.start_url,
        "Configuration resolved"
    );

    // ---- Crawl and extract ----
    let records = scrapers::scrape(&config).await.inspect_err(|e| {
        error!(error = %e, "Scrape failed; nothing was saved");
    })?;
    if records.is_empty() {
        warn!("No posts extracted");
    } else {
        info!(posts = records.len(), "Extracted posts");
    }

    // ---- Output ----
    let written = outputs::persist(&config, &records).await.inspect_err(|e| {
        error!(error = %e, "Failed to save posts");
    })?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        written,
        "Execution complete"
    );

    Ok(())
}

//! Listing page crawling and post extraction.
//!
//! A run has two phases, mirroring how the site is laid out:
//!
//! 1. **Crawling** ([`paginate`]): fetch the start page, then follow the
//!    "older posts" link page by page until the configured count is reached.
//! 2. **Extraction** ([`extract`]): walk every post element of every fetched
//!    page and turn it into a [`TitleRecord`](crate::models::TitleRecord) and
//!    a [`DetailRecord`](crate::models::DetailRecord).
//!
//! Fetching ([`fetch`]) never fails: a page that cannot be retrieved becomes
//! an empty [`Page`]. Navigation and extraction failures do propagate.

pub mod extract;
pub mod fetch;
pub mod paginate;

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::models::RecordSet;
use scraper::Html;
use tracing::{info, instrument};

use extract::RecordExtractor;
use fetch::PageFetcher;
use paginate::Crawler;

/// One fetched listing page.
#[derive(Debug)]
pub struct Page {
    /// The URL the page was requested from.
    pub url: String,
    /// Parsed document; has no nodes at all when the fetch failed.
    pub html: Html,
}

impl Page {
    /// Parse an HTML body fetched from `url`.
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    /// The sentinel for a page that could not be fetched.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: Html::new_document(),
        }
    }

    /// Whether this is the failed-fetch sentinel.
    pub fn is_empty(&self) -> bool {
        !self.html.tree.root().has_children()
    }
}

/// Crawl and extract according to `config`.
///
/// A page count below 1 returns an empty [`RecordSet`] without touching the
/// network.
#[instrument(level = "info", skip_all, fields(pages = config.page_count, start_url = %config.start_url))]
pub async fn scrape(config: &ScraperConfig) -> Result<RecordSet> {
    if config.page_count < 1 {
        info!("Page count below 1; nothing to crawl");
        return Ok(RecordSet::new());
    }

    let selectors = config.selectors.compile()?;
    let fetcher = PageFetcher::new(config.timeout(), selectors.next_page.clone())?;
    let mut crawler = Crawler::new(fetcher, &config.start_url, config.on_missing_link);
    crawler.run(config.page_count).await?;
    let pages = crawler.pages();

    let records = RecordExtractor::new(selectors).extract(pages)?;
    info!(
        pages = pages.len(),
        posts = records.len(),
        "Scrape finished"
    );
    Ok(records)
}

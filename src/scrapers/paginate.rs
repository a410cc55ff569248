//! The pagination loop.
//!
//! Page 1 is the configured start URL; page N is reached by following the
//! "older posts" link of page N-1. Pages are fetched strictly one after the
//! other and kept in crawl order.

use super::Page;
use super::fetch::PageFetcher;
use crate::config::MissingLinkPolicy;
use crate::error::{Result, ScrapeError};
use tracing::{info, instrument, warn};

/// Drives a [`PageFetcher`] across listing pages and holds what it fetched.
///
/// Pages stay on the crawler even when [`run`](Self::run) fails, so a caller
/// can inspect or keep a partial crawl.
#[derive(Debug)]
pub struct Crawler {
    fetcher: PageFetcher,
    start_url: String,
    policy: MissingLinkPolicy,
    pages: Vec<Page>,
}

impl Crawler {
    pub fn new(fetcher: PageFetcher, start_url: &str, policy: MissingLinkPolicy) -> Self {
        Self {
            fetcher,
            start_url: start_url.to_string(),
            policy,
            pages: Vec::new(),
        }
    }

    /// Fetch up to `page_count` pages, starting over from the start URL.
    ///
    /// A count below 1 fetches nothing. When a page has no next link the
    /// configured [`MissingLinkPolicy`] decides between failing with
    /// [`ScrapeError::NextLinkNotFound`] and returning the pages fetched so far.
    #[instrument(level = "info", skip(self), fields(start_url = %self.start_url, policy = ?self.policy))]
    pub async fn run(&mut self, page_count: i64) -> Result<&[Page]> {
        self.pages.clear();
        if page_count < 1 {
            return Ok(&self.pages);
        }

        let first = self.fetcher.fetch(&self.start_url).await;
        self.pages.push(first);

        while (self.pages.len() as i64) < page_count {
            let Some(previous) = self.pages.last() else {
                break;
            };
            let next = match self.fetcher.next_link(previous) {
                Ok(next) => next,
                Err(e @ ScrapeError::NextLinkNotFound { .. })
                    if self.policy == MissingLinkPolicy::Stop =>
                {
                    warn!(
                        fetched = self.pages.len(),
                        requested = page_count,
                        error = %e,
                        "Stopping crawl early"
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            let page = self.fetcher.fetch(&next).await;
            self.pages.push(page);
        }

        let empty = self.pages.iter().filter(|p| p.is_empty()).count();
        info!(fetched = self.pages.len(), empty, "Crawl complete");
        Ok(&self.pages)
    }

    /// Pages fetched by the last run, in crawl order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

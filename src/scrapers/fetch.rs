//! Page fetching and next-link resolution.
//!
//! [`PageFetcher::fetch`] is deliberately infallible: a timeout, a refused
//! connection or an error status is logged with its classification and the
//! caller gets an empty [`Page`] back. The crawl decides what an empty page
//! means for pagination.

use super::Page;
use crate::error::{Result, ScrapeError};
use crate::utils::truncate_for_log;
use reqwest::Client;
use scraper::Selector;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// How a fetch went wrong, used as the `kind` field of the failure log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    Timeout,
    Connect,
    Status,
    Request,
}

impl FetchFailure {
    fn classify(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect
        } else {
            Self::Request
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Status => "status",
            Self::Request => "request",
        }
    }
}

/// HTTP client bound to a timeout and the site's pagination selector.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    next_page: Selector,
}

impl PageFetcher {
    pub fn new(timeout: Duration, next_page: Selector) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, next_page })
    }

    /// GET `url` and parse it, or return an empty page on any failure.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Page {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Self::failed(url, FetchFailure::classify(&e), &e),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                %url,
                kind = FetchFailure::Status.as_str(),
                status = status.as_u16(),
                body_preview = %truncate_for_log(&body, 200),
                "Page returned an error status, skipping this page"
            );
            return Page::empty(url);
        }

        match response.text().await {
            Ok(body) => {
                info!(%url, bytes = body.len(), "Fetched page");
                Page::parse(url, &body)
            }
            Err(e) => Self::failed(url, FetchFailure::classify(&e), &e),
        }
    }

    fn failed(url: &str, kind: FetchFailure, e: &reqwest::Error) -> Page {
        match kind {
            FetchFailure::Timeout => {
                warn!(%url, kind = kind.as_str(), error = %e, "Request timed out, skipping this page")
            }
            _ => error!(%url, kind = kind.as_str(), error = %e, "Request failed, skipping this page"),
        }
        Page::empty(url)
    }

    /// Absolute URL of the "older posts" link on `page`.
    ///
    /// Relative links are resolved against the page's own URL. Fails with
    /// [`ScrapeError::NextLinkNotFound`] when the page has no such link, which
    /// is always the case for an empty page.
    pub fn next_link(&self, page: &Page) -> Result<String> {
        let href = page
            .html
            .select(&self.next_page)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or_else(|| ScrapeError::NextLinkNotFound {
                page_url: page.url.clone(),
            })?;

        let base = Url::parse(&page.url).map_err(|source| ScrapeError::Url {
            url: page.url.clone(),
            source,
        })?;
        let next = base.join(href).map_err(|source| ScrapeError::Url {
            url: href.to_string(),
            source,
        })?;
        debug!(from = %page.url, to = %next, "Resolved next-page link");
        Ok(next.to_string())
    }
}

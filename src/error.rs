//! Error types for the scraper pipeline.
//!
//! Transport failures never surface here: the fetcher downgrades them to an
//! empty [`Page`](crate::scrapers::Page). What remains are the failures that
//! end a run: bad configuration, a page without a "next" link, a post missing
//! one of its fields, and sink I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a scrape run.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid config value for '{field}': {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("invalid CSS selector for '{field}': {selector}")]
    InvalidSelector { field: &'static str, selector: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The page has no "older posts" link, so the crawl cannot advance.
    #[error("no next-page link found on {page_url}")]
    NextLinkNotFound { page_url: String },

    /// A post element lacks a nested element or attribute the extractor reads.
    #[error("post #{post_index} on {page_url} is missing its {field}")]
    MissingPostField {
        page_url: String,
        post_index: usize,
        field: &'static str,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document store error: {0}")]
    DocumentStore(#[from] sled::Error),

    #[error("blocking storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

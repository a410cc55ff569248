//! Run configuration.
//!
//! A [`ScraperConfig`] is assembled from three layers: built-in defaults, an
//! optional YAML file, and command-line flags (highest precedence). Every
//! field of the YAML file is optional:
//!
//! ```yaml
//! page_count: 3
//! start_url: https://thehackernews.com/
//! timeout_ms: 1000
//! sink: relational
//! sink_target: data/posts.sqlite
//! json_output: data/posts.json
//! on_missing_link: stop
//! selectors:
//!   post: a.story-link
//!   author: span.author
//! ```

use crate::cli::Cli;
use crate::error::{Result, ScrapeError};
use clap::ValueEnum;
use scraper::Selector;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Front page of the site the default selectors are written for.
pub const DEFAULT_START_URL: &str = "https://thehackernews.com/";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Where extracted records are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Embedded document store, one collection per record kind.
    Document,
    /// SQLite database with a `post_title` and a `post_detail` table.
    Relational,
    /// A single JSON array of merged posts.
    #[default]
    File,
}

/// What the crawl does when a page has no "next" link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingLinkPolicy {
    /// Fail the run with [`ScrapeError::NextLinkNotFound`].
    #[default]
    Abort,
    /// End the crawl early and keep the pages fetched so far.
    Stop,
}

/// CSS selectors describing the listing page layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// One element per post; its `href` is the post URL.
    pub post: String,
    /// Heading inside a post.
    pub title: String,
    /// Teaser text inside a post.
    pub description: String,
    /// Author label inside a post, wrapped in one delimiter character per side.
    pub author: String,
    /// Thumbnail inside a post.
    pub image: String,
    /// Attribute of the thumbnail holding the lazy-loaded source.
    pub image_attr: String,
    /// The "older posts" pagination link.
    pub next_page: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            post: "a.story-link".to_string(),
            title: "h2.home-title".to_string(),
            description: "div.home-desc".to_string(),
            author: "span".to_string(),
            image: "img".to_string(),
            image_attr: "data-src".to_string(),
            next_page: "a.blog-pager-older-link-mobile".to_string(),
        }
    }
}

/// [`Selectors`] parsed once, ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub post: Selector,
    pub title: Selector,
    pub description: Selector,
    pub author: Selector,
    pub image: Selector,
    pub image_attr: String,
    pub next_page: Selector,
}

impl Selectors {
    pub fn compile(&self) -> Result<CompiledSelectors> {
        if self.image_attr.trim().is_empty() {
            return Err(ScrapeError::InvalidConfig {
                field: "selectors.image_attr",
                message: "must not be empty".to_string(),
            });
        }
        Ok(CompiledSelectors {
            post: parse_selector("selectors.post", &self.post)?,
            title: parse_selector("selectors.title", &self.title)?,
            description: parse_selector("selectors.description", &self.description)?,
            author: parse_selector("selectors.author", &self.author)?,
            image: parse_selector("selectors.image", &self.image)?,
            image_attr: self.image_attr.clone(),
            next_page: parse_selector("selectors.next_page", &self.next_page)?,
        })
    }
}

fn parse_selector(field: &'static str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector {
        field,
        selector: css.to_string(),
    })
}

/// Everything a run needs, with no interactive input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Number of listing pages to crawl; anything below 1 crawls nothing.
    pub page_count: i64,
    pub start_url: String,
    pub timeout_ms: u64,
    pub sink: SinkKind,
    /// Database path or JSON file path, depending on `sink`.
    pub sink_target: Option<PathBuf>,
    /// Extra JSON copy written regardless of `sink`.
    pub json_output: Option<PathBuf>,
    pub on_missing_link: MissingLinkPolicy,
    pub selectors: Selectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_count: 5,
            start_url: DEFAULT_START_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            sink: SinkKind::default(),
            sink_target: None,
            json_output: None,
            on_missing_link: MissingLinkPolicy::default(),
            selectors: Selectors::default(),
        }
    }
}

impl ScraperConfig {
    /// Parse a YAML document; absent fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ScrapeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&yaml)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    /// Build the effective configuration for a CLI invocation.
    ///
    /// Flags given on the command line win over the config file, which wins
    /// over the defaults. The result is validated before it is returned.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(pages) = cli.pages {
            config.page_count = pages;
        }
        if let Some(sink) = cli.sink {
            config.sink = sink;
        }
        if let Some(target) = &cli.target {
            config.sink_target = Some(target.clone());
        }
        if let Some(url) = &cli.start_url {
            config.start_url = url.clone();
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(policy) = cli.on_missing_link {
            config.on_missing_link = policy;
        }
        if let Some(path) = &cli.json_output {
            config.json_output = Some(path.clone());
        }

        config.validate()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// Check the values a run depends on.
    ///
    /// Selectors are not compiled here; [`scrape`](crate::scrapers::scrape)
    /// compiles them once before the first request.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(ScrapeError::InvalidConfig {
                field: "timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }

        let start = Url::parse(&self.start_url).map_err(|source| ScrapeError::Url {
            url: self.start_url.clone(),
            source,
        })?;
        if !matches!(start.scheme(), "http" | "https") {
            return Err(ScrapeError::InvalidConfig {
                field: "start_url",
                message: format!("unsupported scheme '{}'", start.scheme()),
            });
        }

        if self.page_count >= 1 && self.sink_target.is_none() {
            return Err(ScrapeError::InvalidConfig {
                field: "sink_target",
                message: format!("a target is required for the {:?} sink", self.sink),
            });
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

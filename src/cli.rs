//! Command-line interface definitions.
//!
//! Every option is optional here; anything left unset falls back to the
//! config file given with `--config`, then to the built-in defaults (see
//! [`ScraperConfig::resolve`](crate::config::ScraperConfig::resolve)).

use crate::config::{MissingLinkPolicy, SinkKind};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Crawl three pages into a JSON file
/// hackernews_scraper -p 3 -s file -t ./out/posts.json
///
/// # Crawl into SQLite and keep a JSON copy
/// hackernews_scraper -p 5 -s relational -t ./posts.sqlite --json-output ./posts.json
///
/// # Everything from a config file
/// hackernews_scraper -c ./scraper.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of listing pages to crawl
    #[arg(short, long, allow_negative_numbers = true)]
    pub pages: Option<i64>,

    /// Where to store the extracted posts
    #[arg(short, long, value_enum)]
    pub sink: Option<SinkKind>,

    /// Database path or JSON file path for the chosen sink
    #[arg(short, long, env = "HNSCRAPER_SINK_TARGET")]
    pub target: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First listing page to fetch
    #[arg(long)]
    pub start_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Behaviour when a page has no "next" link
    #[arg(long, value_enum)]
    pub on_missing_link: Option<MissingLinkPolicy>,

    /// Also write the merged posts as JSON to this path
    #[arg(long)]
    pub json_output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "hackernews_scraper",
            "--pages",
            "3",
            "--sink",
            "relational",
            "--target",
            "./posts.sqlite",
        ]);

        assert_eq!(cli.pages, Some(3));
        assert_eq!(cli.sink, Some(SinkKind::Relational));
        assert_eq!(cli.target, Some(PathBuf::from("./posts.sqlite")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "hackernews_scraper",
            "-p",
            "1",
            "-s",
            "file",
            "-t",
            "/tmp/posts.json",
            "-c",
            "/tmp/scraper.yaml",
        ]);

        assert_eq!(cli.pages, Some(1));
        assert_eq!(cli.sink, Some(SinkKind::File));
        assert_eq!(cli.target, Some(PathBuf::from("/tmp/posts.json")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/scraper.yaml")));
    }

    #[test]
    fn test_cli_accepts_negative_page_count() {
        let cli = Cli::parse_from(["hackernews_scraper", "-p", "-1"]);
        assert_eq!(cli.pages, Some(-1));
    }

    #[test]
    fn test_cli_missing_link_policy() {
        let cli = Cli::parse_from(["hackernews_scraper", "--on-missing-link", "stop"]);
        assert_eq!(cli.on_missing_link, Some(MissingLinkPolicy::Stop));
    }
}

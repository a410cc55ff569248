//! Sinks that persist extracted records.
//!
//! # Submodules
//!
//! - [`documents`]: embedded document store, one collection per record kind
//! - [`sqlite`]: relational store with a `post_title` and a `post_detail` table
//! - [`json`]: one JSON array of merged posts
//!
//! # Output Layout
//!
//! ```text
//! document store (sled dir)     sqlite file                 json file
//! ├── url-title                 ├── post_title              [
//! │   └── {url, title}          │   (id, url, title)          {url, title, desc,
//! └── url-others                └── post_detail                author, imgSrc},
//!     └── {url, desc,               (id, url, desc,           ...
//!          author, imgSrc}           author, img_src)         ]
//! ```

pub mod documents;
pub mod json;
pub mod sqlite;

use crate::config::{ScraperConfig, SinkKind};
use crate::error::Result;
use crate::models::RecordSet;
use tracing::{info, instrument};

use documents::DocumentStoreSink;
use json::JsonFileSink;
use sqlite::SqliteSink;

/// A destination for one run's records.
pub trait RecordSink {
    /// Store every record, returning the number of posts written.
    async fn save(&self, records: &RecordSet) -> Result<usize>;
}

/// Write `records` to the configured sink, plus the extra JSON copy if set.
///
/// The primary sink is skipped when no target is configured, which
/// validation only allows for runs that crawl no pages. The JSON copy is
/// written either way.
#[instrument(level = "info", skip_all, fields(sink = ?config.sink, posts = records.len()))]
pub async fn persist(config: &ScraperConfig, records: &RecordSet) -> Result<usize> {
    let written = match &config.sink_target {
        Some(target) => match config.sink {
            SinkKind::Document => DocumentStoreSink::new(target).save(records).await?,
            SinkKind::Relational => SqliteSink::new(target).save(records).await?,
            SinkKind::File => JsonFileSink::new(target).save(records).await?,
        },
        None => {
            info!("No sink target configured; skipping primary sink");
            0
        }
    };

    if let Some(path) = &config.json_output {
        JsonFileSink::new(path).save(records).await?;
    }

    Ok(written)
}

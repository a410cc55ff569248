//! Document store output backed by an embedded `sled` database.
//!
//! Title records go to the `url-title` collection and detail records to
//! `url-others`, one JSON document per record. Keys are ids from
//! [`sled::Db::generate_id`] in big-endian form, so iterating a collection
//! returns documents in insertion order across runs.

use super::RecordSink;
use crate::error::Result;
use crate::models::RecordSet;
use crate::utils::ensure_parent_dir;
use serde::Serialize;
use sled::{Batch, Db, Tree};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info, instrument};

pub const TITLE_COLLECTION: &str = "url-title";
pub const DETAIL_COLLECTION: &str = "url-others";

#[derive(Debug, Clone)]
pub struct DocumentStoreSink {
    path: PathBuf,
}

impl DocumentStoreSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Insert `docs` into `collection` as one batch.
fn insert_many<T: Serialize>(db: &Db, collection: &Tree, docs: &[T]) -> Result<()> {
    let mut batch = Batch::default();
    for doc in docs {
        let id = db.generate_id()?;
        batch.insert(id.to_be_bytes().to_vec(), serde_json::to_vec(doc)?);
    }
    collection.apply_batch(batch)?;
    Ok(())
}

impl RecordSink for DocumentStoreSink {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn save(&self, records: &RecordSet) -> Result<usize> {
        ensure_parent_dir(&self.path).await?;
        let path = self.path.clone();
        let owned = records.clone();
        let flushed = task::spawn_blocking(move || -> Result<usize> {
            let db = sled::open(&path)?;

            let titles = db.open_tree(TITLE_COLLECTION)?;
            insert_many(&db, &titles, owned.titles())?;
            let details = db.open_tree(DETAIL_COLLECTION)?;
            insert_many(&db, &details, owned.details())?;

            Ok(db.flush()?)
        })
        .await??;
        debug!(bytes = flushed, "Flushed document store");
        info!(count = records.len(), "Saved posts to document store");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::models::{DetailRecord, TitleRecord};
    use serde::de::DeserializeOwned;

    fn records(range: std::ops::RangeInclusive<usize>) -> RecordSet {
        let mut records = RecordSet::new();
        for n in range {
            records.push(
                TitleRecord {
                    url: format!("u{n}"),
                    title: format!("t{n}"),
                },
                DetailRecord {
                    url: format!("u{n}"),
                    desc: format!("d{n}"),
                    author: format!("a{n}"),
                    img_src: format!("i{n}"),
                },
            );
        }
        records
    }

    fn read_collection<T: DeserializeOwned>(path: &Path, name: &str) -> Vec<T> {
        let db = sled::open(path).unwrap();
        db.open_tree(name)
            .unwrap()
            .iter()
            .values()
            .map(|v| serde_json::from_slice(&v.unwrap()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_save_writes_both_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");

        let written = DocumentStoreSink::new(&path)
            .save(&records(1..=2))
            .await
            .unwrap();
        assert_eq!(written, 2);

        let titles: Vec<TitleRecord> = read_collection(&path, TITLE_COLLECTION);
        let details: Vec<DetailRecord> = read_collection(&path, DETAIL_COLLECTION);
        assert_eq!(titles.len(), 2);
        assert_eq!(details.len(), 2);
        assert_eq!(titles[1].title, "t2");
        assert_eq!(details[0].img_src, "i1");
    }

    #[tokio::test]
    async fn test_documents_use_camel_case_image_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        DocumentStoreSink::new(&path)
            .save(&records(1..=1))
            .await
            .unwrap();

        let raw: Vec<serde_json::Value> = read_collection(&path, DETAIL_COLLECTION);
        assert_eq!(raw[0]["imgSrc"], "i1");
    }

    #[tokio::test]
    async fn test_later_runs_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        let sink = DocumentStoreSink::new(&path);

        sink.save(&records(1..=1)).await.unwrap();
        sink.save(&records(2..=3)).await.unwrap();

        let titles: Vec<TitleRecord> = read_collection(&path, TITLE_COLLECTION);
        let urls: Vec<_> = titles.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, ["u1", "u2", "u3"]);
    }

    #[tokio::test]
    async fn test_open_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        std::fs::write(&path, "not a database").unwrap();

        let err = DocumentStoreSink::new(&path)
            .save(&records(1..=1))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::DocumentStore(_)));
    }
}

//! JSON file output.
//!
//! Each title record is merged with the detail record at the same position
//! and the whole list is written as one compact JSON array:
//!
//! ```text
//! [{"url":"…","title":"…","desc":"…","author":"…","imgSrc":"…"}, …]
//! ```

use super::RecordSink;
use crate::error::{Result, ScrapeError};
use crate::models::RecordSet;
use crate::utils::ensure_parent_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Writes merged posts to a single JSON file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RecordSink for JsonFileSink {
    /// Missing parent directories are created first.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn save(&self, records: &RecordSet) -> Result<usize> {
        let posts = records.merged();
        let json = serde_json::to_string(&posts)?;

        ensure_parent_dir(&self.path).await?;
        info!("Saving JSON");
        fs::write(&self.path, json)
            .await
            .map_err(|source| ScrapeError::Io {
                path: self.path.clone(),
                source,
            })?;
        info!(count = posts.len(), "Wrote JSON file");

        Ok(posts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetailRecord, PostRecord, TitleRecord};

    fn push(records: &mut RecordSet, n: usize) {
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

    #[tokio::test]
    async fn test_single_record_output_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let mut records = RecordSet::new();
        push(&mut records, 1);

        let written = JsonFileSink::new(&path).save(&records).await.unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"[{"url":"u1","title":"t1","desc":"d1","author":"a1","imgSrc":"i1"}]"#
        );
    }

    #[tokio::test]
    async fn test_each_title_pairs_with_its_own_detail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let mut records = RecordSet::new();
        for n in 1..=3 {
            push(&mut records, n);
        }

        JsonFileSink::new(&path).save(&records).await.unwrap();

        let posts: Vec<PostRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(posts.len(), 3);
        for (n, post) in (1..=3).zip(&posts) {
            assert_eq!(post.url, format!("u{n}"));
            assert_eq!(post.desc, format!("d{n}"));
            assert_eq!(post.img_src, format!("i{n}"));
        }
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/2024/posts.json");

        JsonFileSink::new(&path).save(&RecordSet::new()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_write_into_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("posts.json");

        let err = JsonFileSink::new(&path)
            .save(&RecordSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Io { .. }));
    }
}

//! Relational output backed by SQLite.
//!
//! Two tables, created on first use:
//!
//! - `post_title(id, url, title)`
//! - `post_detail(id, url, desc, author, img_src)`
//!
//! `id` is an autoincrementing primary key, every other column is `TEXT`.
//! Rows for one run are inserted in a single transaction on tokio's blocking
//! pool.

use super::RecordSink;
use crate::error::Result;
use crate::models::RecordSet;
use crate::utils::ensure_parent_dir;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct SqliteSink {
    path: PathBuf,
}

impl SqliteSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

pub fn connect(path: &Path) -> Result<Connection> {
    Ok(Connection::open(path)?)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS post_title (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            url     TEXT,
            title   TEXT
        );

        CREATE TABLE IF NOT EXISTS post_detail (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            url     TEXT,
            "desc"  TEXT,
            author  TEXT,
            img_src TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Insert every record of `records` inside one transaction.
pub fn insert_records(conn: &mut Connection, records: &RecordSet) -> Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare("INSERT INTO post_title (url, title) VALUES (?1, ?2)")?;
        for t in records.titles() {
            stmt.execute(params![t.url, t.title])?;
        }

        let mut stmt = tx.prepare(
            r#"INSERT INTO post_detail (url, "desc", author, img_src) VALUES (?1, ?2, ?3, ?4)"#,
        )?;
        for d in records.details() {
            stmt.execute(params![d.url, d.desc, d.author, d.img_src])?;
        }
    }
    tx.commit()?;
    Ok(())
}

impl RecordSink for SqliteSink {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn save(&self, records: &RecordSet) -> Result<usize> {
        ensure_parent_dir(&self.path).await?;
        let path = self.path.clone();
        let owned = records.clone();
        task::spawn_blocking(move || -> Result<()> {
            let mut conn = connect(&path)?;
            init_schema(&conn)?;
            insert_records(&mut conn, &owned)
        })
        .await??;
        info!(count = records.len(), "Saved posts to SQLite");
        Ok(records.len())
    }
}

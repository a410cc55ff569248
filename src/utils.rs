//! Small helpers shared by the scrapers and the sinks.
//!
//! - Author label cleanup
//! - String truncation for log fields
//! - Parent directory creation for output files

use crate::error::{Result, ScrapeError};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Remove exactly one leading and one trailing character.
///
/// Author names are rendered wrapped in a delimiter on each side, e.g.
/// `(Jane Doe)`. Works on characters, not bytes; anything shorter than two
/// characters collapses to an empty string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_delimiters("(Jane Doe)"), "Jane Doe");
/// assert_eq!(strip_delimiters("x"), "");
/// ```
pub fn strip_delimiters(s: &str) -> String {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
        None => s.to_string(),
    }
}

/// Create the parent directory of `path` if it does not exist yet.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if fs::try_exists(parent).await.unwrap_or(false) {
        return Ok(());
    }
    info!(dir = %parent.display(), "Directory does not exist, creating");
    fs::create_dir_all(parent)
        .await
        .map_err(|source| ScrapeError::Io {
            path: parent.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_delimiters_parentheses() {
        assert_eq!(strip_delimiters("(Jane Doe)"), "Jane Doe");
        assert_eq!(strip_delimiters("[The Hacker News]"), "The Hacker News");
    }

    #[test]
    fn test_strip_delimiters_short_labels() {
        assert_eq!(strip_delimiters(""), "");
        assert_eq!(strip_delimiters("x"), "");
        assert_eq!(strip_delimiters("()"), "");
    }

    #[test]
    fn test_strip_delimiters_multibyte() {
        assert_eq!(strip_delimiters("«Zoë»"), "Zoë");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_char_boundary() {
        let result = truncate_for_log("ééé", 1);
        assert_eq!(result, "é…(+4 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/posts.json");
        ensure_parent_dir(&target).await.unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_bare_filename() {
        ensure_parent_dir(Path::new("posts.json")).await.unwrap();
    }
}

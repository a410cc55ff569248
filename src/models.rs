//! Data models for scraped posts.
//!
//! This module defines the record shapes produced by extraction and consumed
//! by the sinks:
//! - [`TitleRecord`]: a post's URL and headline
//! - [`DetailRecord`]: a post's URL, description, author and image
//! - [`RecordSet`]: both lists, appended in lock-step
//! - [`PostRecord`]: the two merged into one flat object for JSON output
//!
//! The image field is serialized as `imgSrc` to keep the JSON layout the
//! downstream consumers already read.

use serde::{Deserialize, Serialize};

/// The URL and headline of one post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TitleRecord {
    /// Link target of the post.
    pub url: String,
    /// Text of the post's heading.
    pub title: String,
}

/// Everything about a post except its headline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetailRecord {
    /// Link target of the post, identical to the matching [`TitleRecord::url`].
    pub url: String,
    /// Teaser text shown under the headline.
    pub desc: String,
    /// Author name with its surrounding delimiters removed.
    pub author: String,
    /// Lazy-loaded thumbnail URL.
    #[serde(rename = "imgSrc")]
    pub img_src: String,
}

/// A title record and detail record merged into one flat object.
///
/// Field order matters: it is the key order of the written JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostRecord {
    pub url: String,
    pub title: String,
    pub desc: String,
    pub author: String,
    #[serde(rename = "imgSrc")]
    pub img_src: String,
}

impl PostRecord {
    /// Merge a title record with its detail record.
    pub fn merge(title: &TitleRecord, detail: &DetailRecord) -> Self {
        Self {
            url: title.url.clone(),
            title: title.title.clone(),
            desc: detail.desc.clone(),
            author: detail.author.clone(),
            img_src: detail.img_src.clone(),
        }
    }
}

/// The two parallel record lists produced by one extraction.
///
/// Records can only be added in pairs, so `titles().len() == details().len()`
/// always holds and the record at index `i` of each list describes the same
/// post.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordSet {
    titles: Vec<TitleRecord>,
    details: Vec<DetailRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one post's records.
    pub fn push(&mut self, title: TitleRecord, detail: DetailRecord) {
        self.titles.push(title);
        self.details.push(detail);
    }

    pub fn titles(&self) -> &[TitleRecord] {
        &self.titles
    }

    pub fn details(&self) -> &[DetailRecord] {
        &self.details
    }

    /// Number of posts.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Merge each title record with the detail record at the same position.
    pub fn merged(&self) -> Vec<PostRecord> {
        self.titles
            .iter()
            .zip(&self.details)
            .map(|(title, detail)| PostRecord::merge(title, detail))
            .collect()
    }
}

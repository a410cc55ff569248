//! Post extraction from fetched listing pages.
//!
//! Every post element yields exactly one [`TitleRecord`] and one
//! [`DetailRecord`]. A post that lacks one of the nested elements or
//! attributes fails the whole extraction; nothing is guessed or skipped.

use super::Page;
use crate::config::CompiledSelectors;
use crate::error::{Result, ScrapeError};
use crate::models::{DetailRecord, RecordSet, TitleRecord};
use crate::utils::strip_delimiters;
use scraper::{ElementRef, Selector};
use tracing::{debug, instrument};

pub struct RecordExtractor {
    selectors: CompiledSelectors,
}

impl RecordExtractor {
    pub fn new(selectors: CompiledSelectors) -> Self {
        Self { selectors }
    }

    /// Extract the posts of every page, in page order then document order.
    #[instrument(level = "info", skip_all, fields(pages = pages.len()))]
    pub fn extract(&self, pages: &[Page]) -> Result<RecordSet> {
        let mut records = RecordSet::new();
        for page in pages {
            let count = self.extract_page(page, &mut records)?;
            debug!(url = %page.url, posts = count, "Extracted page");
        }
        Ok(records)
    }

    /// Append the posts of one page to `records`, returning how many were added.
    pub fn extract_page(&self, page: &Page, records: &mut RecordSet) -> Result<usize> {
        let mut count = 0;
        for (index, post) in page.html.select(&self.selectors.post).enumerate() {
            let (title, detail) = self.extract_post(&page.url, index, post)?;
            records.push(title, detail);
            count += 1;
        }
        Ok(count)
    }

    fn extract_post(
        &self,
        page_url: &str,
        post_index: usize,
        post: ElementRef<'_>,
    ) -> Result<(TitleRecord, DetailRecord)> {
        let missing = |field: &'static str| ScrapeError::MissingPostField {
            page_url: page_url.to_string(),
            post_index,
            field,
        };

        let url = post.value().attr("href").ok_or_else(|| missing("link"))?;
        let title = nested_text(post, &self.selectors.title).ok_or_else(|| missing("title"))?;
        let desc = nested_text(post, &self.selectors.description)
            .ok_or_else(|| missing("description"))?;
        let author = nested_text(post, &self.selectors.author).ok_or_else(|| missing("author"))?;
        let img_src = post
            .select(&self.selectors.image)
            .next()
            .ok_or_else(|| missing("image"))?
            .value()
            .attr(&self.selectors.image_attr)
            .ok_or_else(|| missing("image source"))?;

        Ok((
            TitleRecord {
                url: url.to_string(),
                title,
            },
            DetailRecord {
                url: url.to_string(),
                desc,
                author: strip_delimiters(&author),
                img_src: img_src.to_string(),
            },
        ))
    }
}

/// All text below the first element under `root` matching `selector`.
fn nested_text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
    root.select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

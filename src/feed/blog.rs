use feed_rs::parser;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Entry, Source};

use super::fetcher::{get_bytes, FetchEntries};

/// RSS source. `pubDate` (RFC 822 with offset) is parsed by feed-rs.
pub struct BlogFetcher {
    client: Client,
    url: String,
    page_size: usize,
}

impl BlogFetcher {
    pub fn new(client: Client, url: impl Into<String>, page_size: usize) -> Self {
        Self {
            client,
            url: url.into(),
            page_size,
        }
    }
}

impl FetchEntries for BlogFetcher {
    fn source(&self) -> Source {
        Source::Blog
    }

    async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        let bytes = get_bytes(&self.client, Source::Blog, &self.url).await?;
        let entries = parse_feed(&bytes, self.page_size)?;
        tracing::debug!("Fetched {} entries from {}", entries.len(), self.url);
        Ok(entries)
    }
}

/// Decodes an RSS document into at most `page_size` entries, in document
/// order. Any item missing a title, link or valid pubDate fails the whole
/// document.
pub fn parse_feed(bytes: &[u8], page_size: usize) -> Result<Vec<Entry>> {
    let feed = parser::parse(bytes)?;

    feed.entries
        .into_iter()
        .take(page_size)
        .map(|item| -> Result<Entry> {
            let missing = |field: &str| {
                AppError::source_error(
                    Source::Blog,
                    format!("item {} has no {}", item.id, field),
                )
            };

            let title = item
                .title
                .as_ref()
                .map(|t| t.content.clone())
                .ok_or_else(|| missing("title"))?;
            let url = item
                .links
                .first()
                .map(|l| l.href.clone())
                .ok_or_else(|| missing("link"))?;
            let created_at = item.published.ok_or_else(|| missing("valid pubDate"))?;

            // Fall back to content:encoded when description is absent
            let body = item
                .summary
                .as_ref()
                .map(|s| s.content.clone())
                .or_else(|| item.content.as_ref().and_then(|c| c.body.clone()))
                .unwrap_or_default();

            Ok(Entry {
                id: item.id.clone(),
                title,
                url,
                body,
                created_at,
                updated_at: None,
            })
        })
        .collect()
}

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Entry, Source};

use super::fetcher::{get_bytes, FetchEntries};

#[derive(Debug, Deserialize)]
struct QiitaItem {
    id: String,
    title: String,
    url: String,
    rendered_body: String,
    created_at: DateTime<FixedOffset>,
    updated_at: DateTime<FixedOffset>,
}

impl From<QiitaItem> for Entry {
    fn from(item: QiitaItem) -> Self {
        Entry {
            id: item.id,
            title: item.title,
            url: item.url,
            body: item.rendered_body,
            created_at: item.created_at.with_timezone(&Utc),
            updated_at: Some(item.updated_at.with_timezone(&Utc)),
        }
    }
}

pub struct QiitaFetcher {
    client: Client,
    url: String,
    page_size: usize,
}

impl QiitaFetcher {
    pub fn new(client: Client, url: impl Into<String>, page_size: usize) -> Self {
        Self {
            client,
            url: url.into(),
            page_size,
        }
    }
}

impl FetchEntries for QiitaFetcher {
    fn source(&self) -> Source {
        Source::Qiita
    }

    async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        let bytes = get_bytes(&self.client, Source::Qiita, &self.url).await?;
        let entries = parse_items(&bytes, self.page_size)?;
        tracing::debug!("Fetched {} entries from {}", entries.len(), self.url);
        Ok(entries)
    }
}

/// Decodes the items API response into at most `page_size` entries.
pub fn parse_items(bytes: &[u8], page_size: usize) -> Result<Vec<Entry>> {
    let items: Vec<QiitaItem> = serde_json::from_slice(bytes)?;
    Ok(items.into_iter().take(page_size).map(Entry::from).collect())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::error::AppError;

    const ITEMS: &str = r##"[
      {
        "id": "c686397e4a0f4f11683d",
        "title": "Example title",
        "url": "https://qiita.com/umisama/items/c686397e4a0f4f11683d",
        "rendered_body": "<h1>Example</h1>",
        "body": "# Example",
        "created_at": "2000-01-01T00:00:00+09:00",
        "updated_at": "2000-01-02T12:30:00+09:00",
        "likes_count": 100,
        "tags": [{"name": "Rust", "versions": []}]
      }
    ]"##;

    #[test]
    fn maps_api_items_to_entries() {
        let entries = parse_items(ITEMS.as_bytes(), 5).unwrap();

        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.id, "c686397e4a0f4f11683d");
        assert_eq!(e.title, "Example title");
        assert_eq!(e.body, "<h1>Example</h1>");
        assert_eq!(
            e.created_at,
            Utc.with_ymd_and_hms(1999, 12, 31, 15, 0, 0).unwrap()
        );
        assert_eq!(
            e.updated_at,
            Some(Utc.with_ymd_and_hms(2000, 1, 2, 3, 30, 0).unwrap())
        );
    }

    #[test]
    fn truncates_to_page_size() {
        let items: Vec<serde_json::Value> = (0..20)
            .map(|i| {
                serde_json::json!({
                    "id": format!("item{}", i),
                    "title": "t",
                    "url": "https://qiita.com/x",
                    "rendered_body": "",
                    "created_at": "2024-01-01T00:00:00+09:00",
                    "updated_at": "2024-01-01T00:00:00+09:00",
                })
            })
            .collect();
        let bytes = serde_json::to_vec(&items).unwrap();

        let entries = parse_items(&bytes, 5).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].id, "item0");
        assert_eq!(entries[4].id, "item4");
    }

    #[test]
    fn empty_list_yields_no_entries() {
        assert!(parse_items(b"[]", 5).unwrap().is_empty());
    }

    #[test]
    fn missing_field_fails_whole_response() {
        let body = r#"[{"id": "x", "title": "t", "url": "u", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}]"#;
        assert!(matches!(
            parse_items(body.as_bytes(), 5).unwrap_err(),
            AppError::Json(_)
        ));
    }

    #[test]
    fn error_object_is_rejected() {
        let body = r#"{"message": "Rate limit exceeded", "type": "rate_limit_exceeded"}"#;
        assert!(parse_items(body.as_bytes(), 5).is_err());
    }
}

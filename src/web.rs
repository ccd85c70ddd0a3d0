use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::db::{Repository, DEFAULT_LIST_LIMIT};
use crate::error::{AppError, Result};
use crate::models::{Entry, Source};

const NO_CACHE_HEADERS: [(axum::http::HeaderName, &str); 3] = [
    (
        CACHE_CONTROL,
        "no-cache, no-store, must-revalidate, private, max-age=0",
    ),
    (PRAGMA, "no-cache"),
    (EXPIRES, "Thu, 01 Jan 1970 00:00:00 GMT"),
];

#[derive(Clone)]
pub struct WebState {
    pub repository: Arc<Repository>,
}

pub fn router(state: WebState) -> Router {
    Router::new().route("/", get(index)).with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to render page: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

async fn index(State(state): State<WebState>) -> Result<impl IntoResponse> {
    let mut sections = Vec::with_capacity(Source::ALL.len());
    for source in Source::ALL {
        let entries = state.repository.list(source, DEFAULT_LIST_LIMIT).await?;
        sections.push((source, entries));
    }

    Ok((NO_CACHE_HEADERS, Html(render_page(&sections))))
}

fn render_page(sections: &[(Source, Vec<Entry>)]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>feed-keeper</title></head>\n<body>\n",
    );

    for (source, entries) in sections {
        let _ = writeln!(html, "<h2>{}</h2>", source.label());
        if entries.is_empty() {
            html.push_str("<p>No entries yet.</p>\n");
            continue;
        }
        html.push_str("<ul>\n");
        for entry in entries {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a> <time>{}</time></li>",
                escape(&entry.url),
                escape(&entry.title),
                entry.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{entry, qiita_entry};

    #[tokio::test]
    async fn index_lists_both_sources_without_caching() {
        let repository = Arc::new(Repository::open_in_memory().await.unwrap());
        let mut tricky = entry("a1", 0);
        tricky.title = "<script>alert(1)</script>".to_string();
        repository
            .save_cycle(vec![
                (Source::Blog, vec![tricky]),
                (Source::Qiita, vec![qiita_entry("b1", 0)]),
            ])
            .await
            .unwrap();

        let response = index(State(WebState { repository }))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CACHE_CONTROL],
            "no-cache, no-store, must-revalidate, private, max-age=0"
        );
        assert_eq!(response.headers()[PRAGMA], "no-cache");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("<h2>Blog</h2>"));
        assert!(body.contains("<h2>Qiita</h2>"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(body.contains("https://example.com/b1"));
    }

    #[test]
    fn empty_sections_render_placeholder() {
        let html = render_page(&[(Source::Blog, vec![]), (Source::Qiita, vec![])]);
        assert_eq!(html.matches("No entries yet.").count(), 2);
    }
}

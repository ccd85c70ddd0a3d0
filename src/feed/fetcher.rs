use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Entry, Source};

const USER_AGENT: &str = concat!("feed-keeper/", env!("CARGO_PKG_VERSION"));

/// Retrieves a bounded list of normalized entries from one upstream.
pub trait FetchEntries: Send + Sync {
    fn source(&self) -> Source;

    fn fetch_entries(&self) -> impl Future<Output = Result<Vec<Entry>>> + Send;
}

/// Shared client for both sources. Timeouts are explicit rather than
/// whatever reqwest defaults to.
pub fn build_client(request_timeout: Duration, connect_timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// GET the url and return the raw body, treating non-2xx as an error.
pub(crate) async fn get_bytes(client: &Client, source: Source, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(AppError::source_error(
            source,
            format!("HTTP {} from {}", response.status(), url),
        ));
    }

    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

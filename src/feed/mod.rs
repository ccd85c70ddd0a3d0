mod blog;
mod fetcher;
mod qiita;

pub use blog::{parse_feed, BlogFetcher};
pub use fetcher::{build_client, FetchEntries};
pub use qiita::{parse_items, QiitaFetcher};

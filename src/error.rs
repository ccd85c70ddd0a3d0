use thiserror::Error;

use crate::models::Source;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    FeedParse(#[from] feed_rs::parser::ParseFeedError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    AsyncDatabase(#[from] tokio_rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{feed} feed error: {message}")]
    Source { feed: Source, message: String },

    #[error("Failed to create schema: {0}")]
    SchemaInit(tokio_rusqlite::Error),

    #[error("Failed to commit transaction: {0}")]
    Commit(rusqlite::Error),
}

impl AppError {
    pub fn source_error(feed: Source, message: impl Into<String>) -> Self {
        AppError::Source {
            feed,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_blog_feed_url")]
    pub blog_feed_url: String,

    #[serde(default = "default_qiita_items_url")]
    pub qiita_items_url: String,

    #[serde(default = "default_fetch_interval")]
    pub fetch_interval_minutes: u32,

    /// Entries kept per source and cycle.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("feed-keeper");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("feeds.db").to_string_lossy().to_string()
}

fn default_blog_feed_url() -> String {
    "http://umisama.hatenablog.com/rss".to_string()
}

fn default_qiita_items_url() -> String {
    "https://qiita.com/api/v2/users/umisama/items".to_string()
}

fn default_fetch_interval() -> u32 {
    60
}

fn default_page_size() -> usize {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_listen_addr() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            blog_feed_url: default_blog_feed_url(),
            qiita_items_url: default_qiita_items_url(),
            fetch_interval_minutes: default_fetch_interval(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl Config {
    /// Loads the config at `path`, or the default location when `None`.
    /// A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save(&config_path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("blog_feed_url", &self.blog_feed_url),
            ("qiita_items_url", &self.qiita_items_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }
        if self.fetch_interval_minutes == 0 {
            return Err(AppError::Config(
                "fetch_interval_minutes must be at least 1".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be at least 1".to_string()));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("feed-keeper")
            .join("config.toml")
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.fetch_interval_minutes) * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| AppError::Config(format!("invalid listen_addr {}: {}", self.listen_addr, e)))
    }
}

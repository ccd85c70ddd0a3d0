use std::fmt;

use chrono::{DateTime, Utc};

/// One of the two upstream feeds. Each has its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Blog,
    Qiita,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Blog, Source::Qiita];

    pub fn table(self) -> &'static str {
        match self {
            Source::Blog => "blog_entries",
            Source::Qiita => "qiita_entries",
        }
    }

    /// Only Qiita exposes an update timestamp.
    pub fn has_updated_at(self) -> bool {
        matches!(self, Source::Qiita)
    }

    pub fn label(self) -> &'static str {
        match self {
            Source::Blog => "Blog",
            Source::Qiita => "Qiita",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A post from either source, normalized to the shape we persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    AlreadyPresent,
}

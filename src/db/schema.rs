pub const SCHEMA: &str = r#"
-- blog_entries table (RSS, no update timestamp)
CREATE TABLE IF NOT EXISTS blog_entries (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL CHECK (length(title) <= 511),
    url TEXT NOT NULL CHECK (length(url) <= 511),
    body TEXT NOT NULL CHECK (length(body) <= 10000),
    create_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_blog_entries_create_at ON blog_entries(create_at DESC);

-- qiita_entries table
CREATE TABLE IF NOT EXISTS qiita_entries (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL CHECK (length(title) <= 511),
    url TEXT NOT NULL CHECK (length(url) <= 511),
    body TEXT NOT NULL CHECK (length(body) <= 10000),
    create_at TEXT NOT NULL,
    update_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_qiita_entries_create_at ON qiita_entries(create_at DESC);
"#;

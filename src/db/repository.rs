use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{Entry, SaveOutcome, Source};

use super::schema::SCHEMA;

pub const DEFAULT_LIST_LIMIT: usize = 5;

/// Tally of one cycle's transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub inserted: usize,
    pub already_present: usize,
    pub failed: usize,
}

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .await
            .map_err(AppError::SchemaInit)?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(AppError::SchemaInit)?;

        Ok(Self { conn })
    }

    /// Saves every batch inside a single transaction.
    ///
    /// A failing entry is logged and skipped; the remaining entries are still
    /// attempted. Only a failed commit fails the whole call.
    pub async fn save_cycle(&self, batches: Vec<(Source, Vec<Entry>)>) -> Result<CycleReport> {
        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut report = CycleReport::default();

                for (source, entries) in &batches {
                    for entry in entries {
                        match save(&tx, *source, entry) {
                            Ok(SaveOutcome::Inserted) => report.inserted += 1,
                            Ok(SaveOutcome::AlreadyPresent) => report.already_present += 1,
                            Err(e) => {
                                tracing::warn!(
                                    source = %source,
                                    id = %entry.id,
                                    "Skipping entry: {}",
                                    e
                                );
                                report.failed += 1;
                            }
                        }
                    }
                }

                Ok(tx.commit().map(|()| report))
            })
            .await?;

        outcome.map_err(AppError::Commit)
    }

    /// Newest entries of one source, ordered by creation time descending.
    pub async fn list(&self, source: Source, limit: usize) -> Result<Vec<Entry>> {
        let entries = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT id, title, url, body, create_at{} FROM {} ORDER BY create_at DESC LIMIT ?1",
                    if source.has_updated_at() { ", update_at" } else { "" },
                    source.table(),
                );
                let mut stmt = conn.prepare(&sql)?;
                let entries = stmt
                    .query_map(params![limit as i64], |row| entry_from_row(row, source))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await?;
        Ok(entries)
    }
}

// Row-level operations. These take a plain connection so the cycle can run
// them against its transaction.

pub fn exists(conn: &rusqlite::Connection, source: Source, id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?1 LIMIT 1", source.table()),
            params![id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Plain insert. Fails if the id is already stored.
pub fn insert(conn: &rusqlite::Connection, source: Source, entry: &Entry) -> Result<()> {
    execute_insert(conn, source, entry, "")?;
    Ok(())
}

/// Inserts the entry unless its id is already stored. Existing rows are
/// never touched.
pub fn save(conn: &rusqlite::Connection, source: Source, entry: &Entry) -> Result<SaveOutcome> {
    let changed = execute_insert(conn, source, entry, " ON CONFLICT(id) DO NOTHING")?;
    if changed == 0 {
        Ok(SaveOutcome::AlreadyPresent)
    } else {
        Ok(SaveOutcome::Inserted)
    }
}

fn execute_insert(
    conn: &rusqlite::Connection,
    source: Source,
    entry: &Entry,
    on_conflict: &str,
) -> Result<usize> {
    let created_at = format_timestamp(entry.created_at);

    let changed = match source {
        Source::Blog => conn.execute(
            &format!(
                "INSERT INTO {} (id, title, url, body, create_at) VALUES (?1, ?2, ?3, ?4, ?5){}",
                source.table(),
                on_conflict
            ),
            params![entry.id, entry.title, entry.url, entry.body, created_at],
        )?,
        Source::Qiita => {
            let updated_at = entry.updated_at.ok_or_else(|| {
                AppError::source_error(
                    source,
                    format!("entry {} has no update timestamp", entry.id),
                )
            })?;
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, title, url, body, create_at, update_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6){}",
                    source.table(),
                    on_conflict
                ),
                params![
                    entry.id,
                    entry.title,
                    entry.url,
                    entry.body,
                    created_at,
                    format_timestamp(updated_at),
                ],
            )?
        }
    };

    Ok(changed)
}

/// UTC with second precision, so text order equals time order.
fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp: {}", raw).into(),
        )
    })
}

fn entry_from_row(row: &Row, source: Source) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        body: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        updated_at: if source.has_updated_at() {
            Some(timestamp_column(row, 5)?)
        } else {
            None
        },
    })
}

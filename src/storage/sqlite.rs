//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::model::{FilmRecord, FilmSlug, MediaType};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed record cache
///
/// The connection sits behind a mutex so the cache can be shared by concurrent
/// film lookups. The lock is only held for the duration of a single statement.
pub struct SqliteRecordCache {
    conn: Mutex<Connection>,
    max_age: Option<Duration>,
}

/// Raw column values of one cached record
struct StoredRow {
    media_type: String,
    external_id: Option<String>,
    name: String,
    genres: String,
    poster: String,
    resolved_at: String,
}

impl SqliteRecordCache {
    /// Opens (or creates) the record cache at `path`
    ///
    /// Existing records are loaded as-is; a missing file starts an empty cache.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteRecordCache)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::from_connection(conn)
    }

    /// Creates a cache backed by an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            max_age: None,
        })
    }

    /// Sets how old a record may get before it reads as missing
    ///
    /// `None` keeps records forever.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn put_at(
        &self,
        slug: &FilmSlug,
        record: &FilmRecord,
        resolved_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let genres = serde_json::to_string(&record.genres)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO film_records
                (slug, media_type, external_id, name, genres, poster, resolved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                slug.as_str(),
                record.media_type.to_db_string(),
                record.id,
                record.name,
                genres,
                record.poster,
                resolved_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn is_stale(&self, slug: &FilmSlug, resolved_at: &str) -> StorageResult<bool> {
        let Some(max_age) = self.max_age else {
            return Ok(false);
        };

        let resolved_at = DateTime::parse_from_rfc3339(resolved_at)
            .map_err(|e| StorageError::Corrupt {
                slug: slug.to_string(),
                message: format!("bad timestamp '{}': {}", resolved_at, e),
            })?
            .with_timezone(&Utc);

        Ok(Utc::now() - resolved_at > max_age)
    }
}

impl RecordStore for SqliteRecordCache {
    fn get(&self, slug: &FilmSlug) -> StorageResult<Option<FilmRecord>> {
        let row = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT media_type, external_id, name, genres, poster, resolved_at
                 FROM film_records WHERE slug = ?1",
                params![slug.as_str()],
                |row| {
                    Ok(StoredRow {
                        media_type: row.get(0)?,
                        external_id: row.get(1)?,
                        name: row.get(2)?,
                        genres: row.get(3)?,
                        poster: row.get(4)?,
                        resolved_at: row.get(5)?,
                    })
                },
            )
            .optional()?
        };

        let Some(row) = row else {
            return Ok(None);
        };

        if self.is_stale(slug, &row.resolved_at)? {
            tracing::debug!("Cached record for {} is stale", slug);
            return Ok(None);
        }

        let media_type =
            MediaType::from_db_string(&row.media_type).ok_or_else(|| StorageError::Corrupt {
                slug: slug.to_string(),
                message: format!("unknown media type '{}'", row.media_type),
            })?;

        Ok(Some(FilmRecord {
            media_type,
            id: row.external_id,
            name: row.name,
            genres: serde_json::from_str(&row.genres)?,
            poster: row.poster,
        }))
    }

    fn put(&self, slug: &FilmSlug, record: &FilmRecord) -> StorageResult<()> {
        self.put_at(slug, record, Utc::now())
    }

    fn invalidate(&self, slug: &FilmSlug) -> StorageResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM film_records WHERE slug = ?1",
            params![slug.as_str()],
        )?;
        Ok(removed > 0)
    }

    fn clear(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM film_records", [])?)
    }

    fn len(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM film_records", [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }

    fn flush(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}

//! Storage traits and error types
//!
//! This module defines the trait interface for record cache backends and
//! associated error types.

use crate::model::{FilmRecord, FilmSlug};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record cache row for '{slug}': {message}")]
    Corrupt { slug: String, message: String },

    #[error("Record cache lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistent, key-addressed store of resolved films
///
/// Implementations are shared between concurrent lookups, so every method takes
/// `&self`. A successful `put` must be visible to the next `get` for the same slug
/// and must survive a process restart.
pub trait RecordStore: Send + Sync {
    /// Gets the record stored for a slug, if present and not stale
    fn get(&self, slug: &FilmSlug) -> StorageResult<Option<FilmRecord>>;

    /// Stores the record for a slug, replacing any previous one
    fn put(&self, slug: &FilmSlug, record: &FilmRecord) -> StorageResult<()>;

    /// Removes a single record
    ///
    /// # Returns
    ///
    /// `true` if a record was removed
    fn invalidate(&self, slug: &FilmSlug) -> StorageResult<bool>;

    /// Removes every record, returning how many were removed
    fn clear(&self) -> StorageResult<usize>;

    /// Number of stored records (stale ones included)
    fn len(&self) -> StorageResult<usize>;

    /// Returns true if the store holds no records
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Makes every completed write durable on disk
    fn flush(&self) -> StorageResult<()>;
}

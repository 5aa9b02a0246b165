//! Storage module for the persistent record cache
//!
//! Resolved films are kept in a SQLite database keyed by slug, so a film is only
//! scraped once across process restarts.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteRecordCache;
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::config::CacheConfig;
use std::path::Path;

/// Opens the record cache described by the cache configuration
///
/// # Arguments
///
/// * `config` - Database path and optional record max age
///
/// # Returns
///
/// * `Ok(SqliteRecordCache)` - Successfully opened cache
/// * `Err(StorageError)` - Failed to open or initialize the database
pub fn open_record_cache(config: &CacheConfig) -> StorageResult<SqliteRecordCache> {
    let cache = SqliteRecordCache::open(Path::new(&config.database_path))?
        .with_max_age(config.record_max_age());

    tracing::info!(
        "Record cache at {} holds {} films",
        config.database_path,
        cache.len()?
    );

    Ok(cache)
}

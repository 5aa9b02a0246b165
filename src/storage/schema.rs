//! Database schema definitions
//!
//! This module contains the SQL schema for the record cache database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Fully resolved films, keyed by Letterboxd slug
CREATE TABLE IF NOT EXISTS film_records (
    slug TEXT PRIMARY KEY,
    media_type TEXT NOT NULL,
    external_id TEXT,
    name TEXT NOT NULL,
    genres TEXT NOT NULL,
    poster TEXT NOT NULL,
    resolved_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_film_records_resolved_at ON film_records(resolved_at);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

//! Slug-list caching implementation
//!
//! Each catalog's deduplicated slug list is kept for a fixed time-to-live measured
//! from insertion. An expired entry reads exactly like a missing one.

use crate::model::{CatalogType, FilmSlug};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Time-bounded cache of slug lists, keyed by catalog
#[derive(Clone)]
pub struct SlugListCache {
    entries: Cache<CatalogType, Arc<Vec<FilmSlug>>>,
}

impl SlugListCache {
    /// Creates an empty cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Gets the cached slug list for a catalog, if present and not expired
    pub async fn get(&self, catalog: CatalogType) -> Option<Arc<Vec<FilmSlug>>> {
        self.entries.get(&catalog).await
    }

    /// Stores a slug list, restarting its time-to-live
    pub async fn put(&self, catalog: CatalogType, slugs: Vec<FilmSlug>) -> Arc<Vec<FilmSlug>> {
        let slugs = Arc::new(slugs);
        self.entries.insert(catalog, Arc::clone(&slugs)).await;
        slugs
    }

    /// Drops the cached slug list for a catalog
    pub async fn invalidate(&self, catalog: CatalogType) {
        self.entries.invalidate(&catalog).await;
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Option<Duration> {
        self.entries.policy().time_to_live()
    }
}

impl std::fmt::Debug for SlugListCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlugListCache")
            .field("ttl", &self.ttl())
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

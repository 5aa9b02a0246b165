//! Catalog resolver - main orchestration logic
//!
//! This module ties the pipeline together:
//! - Slug lists come from the slug-list cache or, on a miss, from pagination
//! - Each slug is answered by the record cache or resolved from the site
//! - Per-film lookups fan out concurrently and are joined back in slug order

use crate::cache::SlugListCache;
use crate::config::{Config, FailurePolicy};
use crate::crawler::details::DetailResolver;
use crate::crawler::fetcher::{build_http_client, DocumentFetcher};
use crate::crawler::paginator::SlugPaginator;
use crate::model::{CatalogType, FilmRecord, FilmSlug};
use crate::storage::{open_record_cache, RecordStore};
use crate::CatalogError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Resolves catalogs into film records
///
/// Both caches are handed in at construction and shared by every request served
/// through this resolver.
pub struct CatalogResolver {
    config: Arc<Config>,
    paginator: SlugPaginator,
    details: DetailResolver,
    slug_cache: SlugListCache,
    records: Arc<dyn RecordStore>,
}

impl CatalogResolver {
    /// Creates a resolver around existing caches
    ///
    /// # Arguments
    ///
    /// * `config` - The resolver configuration
    /// * `slug_cache` - In-memory slug-list cache
    /// * `records` - Persistent record cache
    ///
    /// # Returns
    ///
    /// * `Ok(CatalogResolver)` - Successfully created resolver
    /// * `Err(CatalogError)` - Failed to build the HTTP client or parse the base URL
    pub fn new(
        config: Config,
        slug_cache: SlugListCache,
        records: Arc<dyn RecordStore>,
    ) -> Result<Self, CatalogError> {
        let client = build_http_client(&config.user_agent, &config.http)?;
        let fetcher = DocumentFetcher::new(client);
        let paginator = SlugPaginator::new(fetcher.clone(), &config.site, config.catalog.max_pages);
        let details = DetailResolver::new(fetcher, &config.site)?;

        Ok(Self {
            config: Arc::new(config),
            paginator,
            details,
            slug_cache,
            records,
        })
    }

    /// Creates a resolver with caches built from the configuration
    ///
    /// Opens (or creates) the SQLite record cache at `cache.database-path` and
    /// starts an empty slug-list cache with `catalog.slug-ttl-secs` lifetime.
    pub fn open(config: Config) -> Result<Self, CatalogError> {
        let records = open_record_cache(&config.cache)?;
        let slug_cache = SlugListCache::new(Duration::from_secs(config.catalog.slug_ttl_secs));
        Self::new(config, slug_cache, Arc::new(records))
    }

    /// Resolves every film of a catalog
    ///
    /// Film lookups run concurrently (at most `max-concurrent-films` at a time)
    /// and the records come back in slug-list order.
    ///
    /// With `FailurePolicy::FailFast` the first failing film fails the whole call
    /// and the lookups still in flight are dropped, so no partial catalog is ever
    /// returned. With `FailurePolicy::SkipFailed` failing films are logged and
    /// left out.
    pub async fn resolve_catalog(
        &self,
        catalog: CatalogType,
    ) -> Result<Vec<FilmRecord>, CatalogError> {
        let slugs = self.resolve_slugs(catalog).await?;
        let limit = self.config.catalog.max_concurrent_films.max(1) as usize;

        tracing::info!(
            "Resolving {} films for {} catalog ({} concurrent)",
            slugs.len(),
            catalog,
            limit
        );

        // Results arrive in completion order, so the first error ends the
        // collection at once; the index restores slug order afterwards.
        let lookups = stream::iter(slugs.iter().enumerate())
            .map(|(index, slug)| async move {
                self.resolve_film(slug).await.map(|record| (index, record))
            })
            .buffer_unordered(limit);

        let mut indexed: Vec<(usize, FilmRecord)> = match self.config.catalog.failure_policy {
            FailurePolicy::FailFast => lookups.try_collect::<Vec<_>>().await?,
            FailurePolicy::SkipFailed => {
                lookups
                    .filter_map(|result| async move {
                        match result {
                            Ok(entry) => Some(entry),
                            Err(e) => {
                                tracing::warn!("Skipping film: {}", e);
                                None
                            }
                        }
                    })
                    .collect::<Vec<_>>()
                    .await
            }
        };

        indexed.sort_unstable_by_key(|(index, _)| *index);
        let records: Vec<FilmRecord> = indexed.into_iter().map(|(_, record)| record).collect();

        tracing::info!("Resolved {} films for {} catalog", records.len(), catalog);
        Ok(records)
    }

    /// Returns the deduplicated slug list of a catalog
    ///
    /// A cached list is returned as-is; otherwise the list is paginated and the
    /// result cached for the configured time-to-live.
    pub async fn resolve_slugs(
        &self,
        catalog: CatalogType,
    ) -> Result<Arc<Vec<FilmSlug>>, CatalogError> {
        if let Some(slugs) = self.slug_cache.get(catalog).await {
            tracing::info!("Using cached slugs for {} catalog ({})", catalog, slugs.len());
            return Ok(slugs);
        }

        tracing::info!("Fetching slugs for {} catalog", catalog);
        let slugs = self.paginator.resolve_all_slugs(catalog).await?;

        tracing::info!(
            "Caching {} slugs for {} catalog (ttl {:?})",
            slugs.len(),
            catalog,
            self.slug_cache.ttl()
        );
        Ok(self.slug_cache.put(catalog, slugs).await)
    }

    /// Resolves a single film
    ///
    /// A record cache hit makes no network request. On a miss the poster and the
    /// details are fetched concurrently and the merged record is stored before it
    /// is returned; if either fetch fails nothing is stored.
    ///
    /// # Errors
    ///
    /// Every failure is wrapped in `CatalogError::Film` carrying the slug.
    pub async fn resolve_film(&self, slug: &FilmSlug) -> Result<FilmRecord, CatalogError> {
        self.lookup_film(slug)
            .await
            .map_err(|source| CatalogError::Film {
                slug: slug.clone(),
                source: Box::new(source),
            })
    }

    async fn lookup_film(&self, slug: &FilmSlug) -> Result<FilmRecord, CatalogError> {
        if let Some(record) = self.records.get(slug)? {
            tracing::debug!("Record cache hit for {}", slug);
            return Ok(record);
        }

        tracing::debug!("Resolving {} from the site", slug);
        let (poster, details) = futures::try_join!(
            self.details.resolve_poster(slug),
            self.details.resolve_details(slug)
        )?;

        let record = FilmRecord::new(details, poster);
        self.records.put(slug, &record)?;
        tracing::debug!("Cached record for {}", slug);

        Ok(record)
    }

    /// The persistent record cache
    pub fn records(&self) -> &dyn RecordStore {
        self.records.as_ref()
    }

    /// The in-memory slug-list cache
    pub fn slug_cache(&self) -> &SlugListCache {
        &self.slug_cache
    }

    /// The configuration this resolver was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flushes the record cache to disk
    pub fn shutdown(&self) -> Result<(), CatalogError> {
        self.records.flush()?;
        tracing::info!("Record cache flushed");
        Ok(())
    }
}

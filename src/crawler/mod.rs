//! Crawler module for catalog resolution
//!
//! This module contains the scraping pipeline, including:
//! - HTTP fetching and document parsing
//! - HTML extraction of slugs, posters and film details
//! - List pagination with slug deduplication
//! - Overall catalog orchestration over both caches

mod coordinator;
mod details;
mod fetcher;
mod parser;
mod paginator;

pub use coordinator::CatalogResolver;
pub use details::DetailResolver;
pub use fetcher::{build_http_client, DocumentFetcher};
pub use paginator::SlugPaginator;
pub use parser::{
    extract_film_name, extract_film_slugs, extract_genres, extract_imdb_id, extract_poster_url,
    next_page_href, page_number_from_href, title_case,
};

use crate::config::Config;
use crate::model::{CatalogType, FilmRecord};
use crate::CatalogError;

/// Resolves one catalog with caches opened from the configuration
///
/// Convenience for one-shot use: the resolver (and its slug-list cache) is dropped
/// afterwards, while resolved films stay in the record cache on disk.
///
/// # Arguments
///
/// * `config` - The resolver configuration
/// * `catalog` - Which catalog to resolve
pub async fn resolve_catalog(
    config: Config,
    catalog: CatalogType,
) -> Result<Vec<FilmRecord>, CatalogError> {
    let resolver = CatalogResolver::open(config)?;
    let records = resolver.resolve_catalog(catalog).await?;
    resolver.shutdown()?;
    Ok(records)
}

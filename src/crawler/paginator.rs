//! Slug paginator
//!
//! Walks the pages of a list, following each page's "next" link, and merges the
//! film slugs of every page into one deduplicated list.

use crate::config::SiteConfig;
use crate::crawler::fetcher::DocumentFetcher;
use crate::crawler::parser::{extract_film_slugs, next_page_href, page_number_from_href};
use crate::model::{CatalogType, FilmSlug};
use crate::CatalogError;
use std::collections::HashSet;

/// Slugs and pagination link extracted from one list page
struct ListingPage {
    slugs: Vec<FilmSlug>,
    next_href: Option<String>,
}

/// Collects every film slug of a paginated list
#[derive(Debug, Clone)]
pub struct SlugPaginator {
    fetcher: DocumentFetcher,
    base_url: String,
    list_path: String,
    max_pages: u32,
}

impl SlugPaginator {
    /// Creates a paginator for the list described by `site`
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Document fetcher used for every list page
    /// * `site` - Base URL and list path
    /// * `max_pages` - Hard cap on pages fetched per catalog
    pub fn new(fetcher: DocumentFetcher, site: &SiteConfig, max_pages: u32) -> Self {
        Self {
            fetcher,
            base_url: site.base_url.trim_end_matches('/').to_string(),
            list_path: site.list_path.clone(),
            max_pages: max_pages.max(1),
        }
    }

    /// Builds the URL of one list page, e.g. `{base}/dave/list/top-250/by/popular/page/2/`
    pub fn page_url(&self, catalog: CatalogType, page: u32) -> String {
        format!(
            "{}{}{}page/{}/",
            self.base_url,
            self.list_path,
            catalog.filter_path(),
            page
        )
    }

    /// Resolves every slug of a catalog's list
    ///
    /// # Pagination Rules
    ///
    /// - Starts at page 1 and follows `.paginate-nextprev .next`
    /// - Stops when there is no next link, the link has no href, or its page number
    ///   cannot be parsed
    /// - Stops when the next page was already fetched
    /// - Stops after `max_pages` fetches, keeping what was collected
    ///
    /// # Returns
    ///
    /// Slugs in first-seen order with duplicates across pages removed. Any fetch
    /// failure aborts the whole pagination.
    pub async fn resolve_all_slugs(
        &self,
        catalog: CatalogType,
    ) -> Result<Vec<FilmSlug>, CatalogError> {
        let mut slugs = Vec::new();
        let mut seen = HashSet::new();
        let mut visited = HashSet::new();
        let mut page = 1;

        loop {
            if visited.len() as u32 >= self.max_pages {
                tracing::warn!(
                    "Stopping {} catalog pagination at the {} page limit",
                    catalog,
                    self.max_pages
                );
                break;
            }

            visited.insert(page);
            let listing = self.fetch_listing(&self.page_url(catalog, page)).await?;

            let before = slugs.len();
            for slug in listing.slugs {
                if seen.insert(slug.clone()) {
                    slugs.push(slug);
                }
            }
            tracing::info!(
                "Page {} of {} catalog: {} new slugs, {} total",
                page,
                catalog,
                slugs.len() - before,
                slugs.len()
            );

            let Some(href) = listing.next_href else {
                break;
            };

            match page_number_from_href(&href) {
                Some(next) if visited.contains(&next) => {
                    tracing::warn!("Next link {} points back to page {}, stopping", href, next);
                    break;
                }
                Some(next) => page = next,
                None => {
                    tracing::warn!("Unusable next page link '{}', stopping", href);
                    break;
                }
            }
        }

        Ok(slugs)
    }

    async fn fetch_listing(&self, url: &str) -> Result<ListingPage, CatalogError> {
        let document = self.fetcher.fetch_document(url).await?;
        Ok(ListingPage {
            slugs: extract_film_slugs(&document),
            next_href: next_page_href(&document),
        })
    }
}

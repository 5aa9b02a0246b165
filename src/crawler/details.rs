//! Detail resolver
//!
//! Fetches the poster and the descriptive metadata of a single film. The two
//! lookups hit different endpoints and are independent of each other.

use crate::config::SiteConfig;
use crate::crawler::fetcher::DocumentFetcher;
use crate::crawler::parser::{
    extract_film_name, extract_genres, extract_imdb_id, extract_poster_url,
};
use crate::model::{FilmDetails, FilmSlug};
use crate::CatalogError;
use url::Url;

/// Poster rendition requested from the poster endpoint
const POSTER_SIZE: &str = "230x345";

/// Resolves posters and details for individual films
#[derive(Debug, Clone)]
pub struct DetailResolver {
    fetcher: DocumentFetcher,
    base_url: Url,
}

impl DetailResolver {
    /// Creates a resolver for the site described by `site`
    pub fn new(fetcher: DocumentFetcher, site: &SiteConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            fetcher,
            base_url: Url::parse(&site.base_url)?,
        })
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// URL of the poster-rendering endpoint for a film
    pub fn poster_url(&self, slug: &FilmSlug) -> String {
        format!(
            "{}/ajax/poster/film/{}/hero/{}/",
            self.base(),
            slug,
            POSTER_SIZE
        )
    }

    /// URL of a film's page
    pub fn film_url(&self, slug: &FilmSlug) -> String {
        format!("{}/film/{}/", self.base(), slug)
    }

    /// Resolves the poster image URL of a film
    ///
    /// # Errors
    ///
    /// Fetch errors propagate unchanged; a poster page without an `.image`
    /// source is a `CatalogError::Extraction`.
    pub async fn resolve_poster(&self, slug: &FilmSlug) -> Result<String, CatalogError> {
        let url = self.poster_url(slug);
        let document = self.fetcher.fetch_document(&url).await?;

        extract_poster_url(&document, &self.base_url).ok_or_else(|| CatalogError::Extraction {
            url,
            what: "poster image".to_string(),
        })
    }

    /// Resolves name, IMDb id and genres of a film
    ///
    /// A missing IMDb link leaves `id` empty; a missing header is a
    /// `CatalogError::Extraction`.
    pub async fn resolve_details(&self, slug: &FilmSlug) -> Result<FilmDetails, CatalogError> {
        let url = self.film_url(slug);
        let document = self.fetcher.fetch_document(&url).await?;

        let name = extract_film_name(&document).ok_or_else(|| CatalogError::Extraction {
            url: url.clone(),
            what: "film name".to_string(),
        })?;

        let id = extract_imdb_id(&document);
        if id.is_none() {
            tracing::debug!("No IMDb link on {}", url);
        }

        Ok(FilmDetails {
            id,
            name,
            genres: extract_genres(&document),
        })
    }
}

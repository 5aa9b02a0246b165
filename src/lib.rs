//! Letterboxd Catalog: resolves Letterboxd lists into film metadata records
//!
//! This crate scrapes a paginated Letterboxd list, deduplicates the film slugs it
//! finds, and enriches every slug with poster and detail data. Slug lists are kept
//! in a time-bounded in-memory cache and resolved films in a persistent SQLite cache.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod model;
pub mod storage;

use thiserror::Error;

/// Main error type for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Malformed document at {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Missing {what} in {url}")]
    Extraction { url: String, what: String },

    #[error("Failed to resolve film '{slug}': {source}")]
    Film {
        slug: model::FilmSlug,
        source: Box<CatalogError>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

impl CatalogError {
    /// Returns true if a fetch-level failure caused this error
    pub fn is_fetch(&self) -> bool {
        match self {
            Self::Fetch { .. } | Self::Status { .. } | Self::Timeout { .. } => true,
            Self::Film { source, .. } => source.is_fetch(),
            _ => false,
        }
    }

    /// Returns true if an expected element was missing from a fetched document
    pub fn is_extraction(&self) -> bool {
        match self {
            Self::Extraction { .. } => true,
            Self::Film { source, .. } => source.is_extraction(),
            _ => false,
        }
    }

    /// Returns the slug this error is attributed to, if any
    pub fn slug(&self) -> Option<&model::FilmSlug> {
        match self {
            Self::Film { slug, .. } => Some(slug),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::SlugListCache;
pub use config::Config;
pub use crawler::CatalogResolver;
pub use model::{CatalogType, FilmRecord, FilmSlug, MediaType};
pub use storage::{RecordStore, SqliteRecordCache};

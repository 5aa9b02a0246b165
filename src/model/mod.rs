//! Catalog data model
//!
//! Film slugs, resolved film records and the catalog variants that select which
//! listing is scraped.

mod catalog_type;
mod film;

pub use catalog_type::{CatalogType, ParseCatalogTypeError};
pub use film::{FilmDetails, FilmRecord, FilmSlug, MediaType};

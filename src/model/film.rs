use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a film on Letterboxd (the `{slug}` in `/film/{slug}/`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmSlug(String);

impl FilmSlug {
    /// Wraps a raw slug string
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilmSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FilmSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FilmSlug {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

impl From<String> for FilmSlug {
    fn from(slug: String) -> Self {
        Self(slug)
    }
}

/// Kind of media a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
}

impl MediaType {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            _ => None,
        }
    }
}

/// Descriptive metadata scraped from a film's page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmDetails {
    /// External cross-reference id (IMDb), when the page links to one
    pub id: Option<String>,

    /// Display name of the film
    pub name: String,

    /// Genres in document order, title-cased
    pub genres: Vec<String>,
}

/// A fully resolved film
///
/// Serializes to `{ "type": "movie", "id": ..., "name": ..., "genres": [...], "poster": ... }`.
/// The originating slug is not part of the record; it is the key the record is
/// stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRecord {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub id: Option<String>,
    pub name: String,
    pub genres: Vec<String>,
    pub poster: String,
}

impl FilmRecord {
    /// Merges scraped details with a poster URL into a movie record
    pub fn new(details: FilmDetails, poster: String) -> Self {
        Self {
            media_type: MediaType::Movie,
            id: details.id,
            name: details.name,
            genres: details.genres,
            poster,
        }
    }
}

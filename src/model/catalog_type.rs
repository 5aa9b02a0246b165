/// Catalog variants and their listing filters
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Selects which ordering of the remote list is scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogType {
    /// The list in its own (ranked) order
    Top,

    /// The list sorted by Letterboxd popularity
    Popular,

    /// The list sorted by release date, newest first
    New,
}

/// Error returned when a catalog name is not one of the supported variants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown catalog type '{0}' (expected top, popular or new)")]
pub struct ParseCatalogTypeError(pub String);

impl CatalogType {
    /// All supported catalog variants
    pub const ALL: [CatalogType; 3] = [Self::Top, Self::Popular, Self::New];

    /// Returns the catalog identifier used by callers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Popular => "popular",
            Self::New => "new",
        }
    }

    /// Returns the path fragment inserted between the list path and the page segment
    ///
    /// The fragment is either empty or ends with a slash, so it can be concatenated
    /// directly in front of `page/{n}/`.
    pub fn filter_path(&self) -> &'static str {
        match self {
            Self::Top => "",
            Self::Popular => "by/popular/",
            Self::New => "by/release/",
        }
    }
}

impl fmt::Display for CatalogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogType {
    type Err = ParseCatalogTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "popular" => Ok(Self::Popular),
            "new" => Ok(Self::New),
            _ => Err(ParseCatalogTypeError(s.to_string())),
        }
    }
}

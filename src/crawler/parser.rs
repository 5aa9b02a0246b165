//! HTML extraction for listing, poster and film pages
//!
//! This module pulls catalog data out of parsed documents:
//! - Film slugs from list pages (`.linked-film-poster[data-film-slug]`)
//! - The "next page" link of a list page
//! - The poster image of the poster endpoint
//! - Name, IMDb id and genres of a film page
//!
//! Every function works on an already parsed document and never fails; missing
//! elements come back as `None` or an empty list and callers decide whether that
//! is an error.

use crate::model::FilmSlug;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts film slugs from a list page, in document order
///
/// Poster elements without a `data-film-slug` attribute are skipped.
pub fn extract_film_slugs(document: &Html) -> Vec<FilmSlug> {
    let Ok(selector) = Selector::parse(".linked-film-poster") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("data-film-slug"))
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(FilmSlug::from)
        .collect()
}

/// Returns the href of the "next page" link, if the page has a usable one
pub fn next_page_href(document: &Html) -> Option<String> {
    let selector = Selector::parse(".paginate-nextprev .next").ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// Parses the page number out of a pagination href
///
/// The number is the second-to-last `/`-delimited segment, so
/// `/dave/list/top-250/page/3/` yields 3. Anything else yields `None`.
pub fn page_number_from_href(href: &str) -> Option<u32> {
    let segments: Vec<&str> = href.split('/').collect();
    if segments.len() < 2 {
        return None;
    }

    segments[segments.len() - 2].parse().ok()
}

/// Extracts the poster image URL from the poster endpoint's markup
///
/// Relative sources are resolved against `base_url`.
pub fn extract_poster_url(document: &Html, base_url: &Url) -> Option<String> {
    let selector = Selector::parse(".image").ok()?;

    let src = document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())?;

    base_url.join(src).ok().map(|url| url.to_string())
}

/// Extracts the display name from a film page's header
pub fn extract_film_name(document: &Html) -> Option<String> {
    let selector = Selector::parse("#featured-film-header h1").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element_text(&element))
        .filter(|name| !name.is_empty())
}

/// Extracts the IMDb id (e.g. `tt0111161`) from a film page
///
/// The id is the fifth `/`-delimited segment of the first IMDb link, i.e. the
/// segment after `/title/` in `http://www.imdb.com/title/tt0111161/maindetails`.
pub fn extract_imdb_id(document: &Html) -> Option<String> {
    let selector =
        Selector::parse(r#"a[href^="http://www.imdb.com"], a[href^="https://www.imdb.com"]"#)
            .ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| href.split('/').nth(4))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Extracts title-cased genres from a film page's genre tab
///
/// Only slugs linking into `/genre/` count; theme and nanogenre links in the same
/// tab are ignored. Document order is kept and repeats are dropped.
pub fn extract_genres(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("#tab-genres .text-slug") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter(|element| {
            element
                .value()
                .attr("href")
                .is_some_and(|href| href.contains("/genre/"))
        })
        .map(|element| title_case(&element_text(&element)))
        .filter(|genre| !genre.is_empty() && seen.insert(genre.clone()))
        .collect()
}

/// Capitalizes the first word character of every whitespace-delimited token
///
/// The remainder of each token is lowercased; characters before the first word
/// character and all whitespace are left untouched.
///
/// ```
/// use letterboxd_catalog::crawler::title_case;
///
/// assert_eq!(title_case("science fiction"), "Science Fiction");
/// assert_eq!(title_case("FILM-NOIR"), "Film-noir");
/// ```
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_whitespace() {
            in_word = false;
            result.push(c);
        } else if in_word {
            result.extend(c.to_lowercase());
        } else if c.is_alphanumeric() || c == '_' {
            in_word = true;
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
    }

    result
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

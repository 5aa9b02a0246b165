//! Integration tests for catalog resolution
//!
//! These tests use wiremock to stand in for the listing, poster and film
//! endpoints and exercise the full pipeline end-to-end, including both caches.

use letterboxd_catalog::config::{
    CacheConfig, CatalogConfig, Config, FailurePolicy, HttpConfig, SiteConfig, UserAgentConfig,
};
use letterboxd_catalog::{
    CatalogResolver, CatalogType, FilmRecord, FilmSlug, RecordStore, SlugListCache,
    SqliteRecordCache,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIST_PATH: &str = "/dave/list/official-top-250-narrative-feature-films/";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, db_path: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            list_path: LIST_PATH.to_string(),
        },
        user_agent: UserAgentConfig {
            client_name: "TestClient".to_string(),
            client_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        http: HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            max_redirects: 5,
        },
        catalog: CatalogConfig {
            max_pages: 10,
            max_concurrent_films: 8,
            slug_ttl_secs: 60,
            failure_policy: FailurePolicy::FailFast,
        },
        cache: CacheConfig {
            database_path: db_path.to_string(),
            record_max_age_hours: None,
        },
    }
}

/// Builds a resolver with an in-memory record cache
fn in_memory_resolver(config: Config, slug_ttl: Duration) -> CatalogResolver {
    let records = SqliteRecordCache::open_in_memory().expect("Failed to open record cache");
    CatalogResolver::new(config, SlugListCache::new(slug_ttl), Arc::new(records))
        .expect("Failed to create resolver")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn listing_page(slugs: &[&str], next_page: Option<u32>) -> String {
    let posters: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li class="poster-container"><div class="really-lazy-load poster film-poster linked-film-poster" data-film-slug="{}"></div></li>"#,
                slug
            )
        })
        .collect();

    let pagination = match next_page {
        Some(page) => format!(
            r#"<div class="paginate-nextprev"><a class="next" href="{}page/{}/">Newer</a></div>"#,
            LIST_PATH, page
        ),
        None => r#"<div class="paginate-nextprev"><span class="next">Newer</span></div>"#
            .to_string(),
    };

    format!(
        r#"<html><body><ul class="poster-list">{}</ul>{}</body></html>"#,
        posters, pagination
    )
}

fn poster_page(slug: &str) -> String {
    format!(
        r#"<div class="film-poster"><img class="image" src="https://a.ltrbxd.com/{}-230-345.jpg" alt="" /></div>"#,
        slug
    )
}

fn film_page(name: &str, imdb_id: Option<&str>) -> String {
    let imdb_link = imdb_id
        .map(|id| format!(r#"<a href="http://www.imdb.com/title/{}/maindetails">IMDb</a>"#, id))
        .unwrap_or_default();

    format!(
        r#"<html><body>
        <section id="featured-film-header"><h1 class="headline-1">{}</h1></section>
        <p class="text-link text-footer">{}<a href="https://www.themoviedb.org/movie/1/">TMDb</a></p>
        <div id="tab-genres">
            <div class="text-sluglist capitalize">
                <a class="text-slug" href="/films/genre/science-fiction/">science fiction</a>
                <a class="text-slug" href="/films/genre/film-noir/">FILM-NOIR</a>
                <a class="text-slug" href="/films/theme/dystopia/">dystopia</a>
            </div>
        </div>
        </body></html>"#,
        name, imdb_link
    )
}

async fn mount_listing(
    server: &MockServer,
    list_path: &str,
    page: u32,
    slugs: &[&str],
    next_page: Option<u32>,
    expected: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("{}page/{}/", list_path, page)))
        .respond_with(html(listing_page(slugs, next_page)))
        .expect(expected)
        .mount(server)
        .await;
}

/// Mounts the poster and film pages of one film
async fn mount_film(
    server: &MockServer,
    slug: &str,
    name: &str,
    imdb_id: Option<&str>,
    delay: Duration,
    expected: Option<u64>,
) {
    let poster = Mock::given(method("GET"))
        .and(path(format!("/ajax/poster/film/{}/hero/230x345/", slug)))
        .respond_with(html(poster_page(slug)).set_delay(delay));
    let film = Mock::given(method("GET"))
        .and(path(format!("/film/{}/", slug)))
        .respond_with(html(film_page(name, imdb_id)).set_delay(delay));

    match expected {
        Some(count) => {
            poster.expect(count).mount(server).await;
            film.expect(count).mount(server).await;
        }
        None => {
            poster.mount(server).await;
            film.mount(server).await;
        }
    }
}

fn names(records: &[FilmRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_duplicate_slugs_across_pages_are_returned_once() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["alien", "ran"], Some(2), 1).await;
    mount_listing(&server, LIST_PATH, 2, &["ran", "ikiru"], None, 1).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let slugs = resolver
        .resolve_slugs(CatalogType::Top)
        .await
        .expect("Pagination failed");

    assert_eq!(
        *slugs,
        vec![
            FilmSlug::from("alien"),
            FilmSlug::from("ran"),
            FilmSlug::from("ikiru"),
        ]
    );
}

#[tokio::test]
async fn test_pagination_stops_at_page_without_next_link() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["a"], Some(2), 1).await;
    mount_listing(&server, LIST_PATH, 2, &["b"], Some(3), 1).await;
    mount_listing(&server, LIST_PATH, 3, &["c"], None, 1).await;
    // Must never be requested
    mount_listing(&server, LIST_PATH, 4, &["d"], None, 0).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let slugs = resolver.resolve_slugs(CatalogType::Top).await.unwrap();

    assert_eq!(slugs.len(), 3);
    // Wiremock verifies the per-page request counts when the server drops
}

#[tokio::test]
async fn test_pagination_respects_page_limit() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["a"], Some(2), 1).await;
    mount_listing(&server, LIST_PATH, 2, &["b"], Some(3), 1).await;
    mount_listing(&server, LIST_PATH, 3, &["c"], Some(4), 0).await;

    let mut config = create_test_config(&server.uri(), ":memory:");
    config.catalog.max_pages = 2;
    let resolver = in_memory_resolver(config, Duration::from_secs(60));

    let slugs = resolver.resolve_slugs(CatalogType::Top).await.unwrap();
    assert_eq!(*slugs, vec![FilmSlug::from("a"), FilmSlug::from("b")]);
}

#[tokio::test]
async fn test_next_link_back_to_visited_page_stops() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["a"], Some(2), 1).await;
    mount_listing(&server, LIST_PATH, 2, &["b"], Some(1), 1).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let slugs = resolver.resolve_slugs(CatalogType::Top).await.unwrap();

    assert_eq!(slugs.len(), 2);
}

#[tokio::test]
async fn test_empty_listing_gives_empty_catalog() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &[], None, 1).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_popular_catalog_uses_filter_path() {
    let server = MockServer::start().await;
    let popular_path = format!("{}by/popular/", LIST_PATH);
    mount_listing(&server, &popular_path, 1, &["barbie"], None, 1).await;
    mount_film(&server, "barbie", "Barbie", Some("tt1517268"), Duration::ZERO, Some(1)).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let records = resolver
        .resolve_catalog(CatalogType::Popular)
        .await
        .unwrap();

    assert_eq!(names(&records), vec!["Barbie"]);
}

#[tokio::test]
async fn test_resolved_record_fields() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["blade-runner"], None, 1).await;
    mount_film(
        &server,
        "blade-runner",
        "Blade Runner",
        Some("tt0083658"),
        Duration::ZERO,
        Some(1),
    )
    .await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id.as_deref(), Some("tt0083658"));
    assert_eq!(record.name, "Blade Runner");
    assert_eq!(
        record.genres,
        vec!["Science Fiction".to_string(), "Film-noir".to_string()]
    );
    assert_eq!(record.poster, "https://a.ltrbxd.com/blade-runner-230-345.jpg");

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["type"], "movie");
}

#[tokio::test]
async fn test_warm_caches_make_no_further_requests() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["alien", "aliens"], None, 1).await;
    mount_film(&server, "alien", "Alien", Some("tt0078748"), Duration::ZERO, Some(1)).await;
    mount_film(&server, "aliens", "Aliens", Some("tt0090605"), Duration::ZERO, Some(1)).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );

    let first = resolver.resolve_catalog(CatalogType::Top).await.unwrap();
    let second = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(names(&first), vec!["Alien", "Aliens"]);
    // Each endpoint was mounted with expect(1); a second fetch fails verification
}

#[tokio::test]
async fn test_resolved_records_are_written_through() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["stalker"], None, 1).await;
    mount_film(&server, "stalker", "Stalker", Some("tt0079944"), Duration::ZERO, Some(1)).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    let cached = resolver
        .records()
        .get(&FilmSlug::from("stalker"))
        .unwrap()
        .expect("Record should be cached");
    assert_eq!(cached, records[0]);
}

#[tokio::test]
async fn test_missing_imdb_link_gives_null_id() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["home-movie"], None, 1).await;
    mount_film(&server, "home-movie", "Home Movie", None, Duration::ZERO, Some(1)).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, None);
    assert!(serde_json::to_value(&records[0]).unwrap()["id"].is_null());
}

#[tokio::test]
async fn test_fan_out_preserves_slug_order() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["a", "b", "c"], None, 1).await;
    mount_film(&server, "a", "A", None, Duration::ZERO, Some(1)).await;
    mount_film(&server, "b", "B", None, Duration::from_millis(400), Some(1)).await;
    mount_film(&server, "c", "C", None, Duration::ZERO, Some(1)).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    assert_eq!(names(&records), vec!["A", "B", "C"]);
}

/// Mounts a listing of a, b, c where b's poster page has no image
async fn mount_catalog_with_broken_poster(server: &MockServer, a_delay: Duration) {
    mount_listing(server, LIST_PATH, 1, &["a", "b", "c"], None, 1).await;
    mount_film(server, "a", "A", None, a_delay, None).await;
    mount_film(server, "c", "C", None, Duration::ZERO, None).await;

    Mock::given(method("GET"))
        .and(path("/ajax/poster/film/b/hero/230x345/"))
        .respond_with(html(r#"<div class="film-poster"></div>"#.to_string()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/film/b/"))
        .respond_with(html(film_page("B", None)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_extraction_failure_fails_whole_catalog() {
    let server = MockServer::start().await;
    mount_catalog_with_broken_poster(&server, Duration::ZERO).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let err = resolver
        .resolve_catalog(CatalogType::Top)
        .await
        .expect_err("Catalog should fail when one film fails");

    assert!(err.is_extraction(), "unexpected error: {}", err);
    assert_eq!(err.slug(), Some(&FilmSlug::from("b")));
    assert!(err.to_string().contains("/ajax/poster/film/b/"));

    // Nothing partial is stored for the failing film
    assert_eq!(resolver.records().get(&FilmSlug::from("b")).unwrap(), None);
}

#[tokio::test]
async fn test_failure_surfaces_without_waiting_for_slower_films() {
    let server = MockServer::start().await;
    mount_catalog_with_broken_poster(&server, Duration::from_millis(1500)).await;

    let mut config = create_test_config(&server.uri(), ":memory:");
    config.catalog.max_concurrent_films = 2;
    let resolver = in_memory_resolver(config, Duration::from_secs(60));

    let started = Instant::now();
    let err = resolver
        .resolve_catalog(CatalogType::Top)
        .await
        .expect_err("Catalog should fail when one film fails");
    let elapsed = started.elapsed();

    assert_eq!(err.slug(), Some(&FilmSlug::from("b")));
    assert!(
        elapsed < Duration::from_millis(1000),
        "failure surfaced only after {:?}",
        elapsed
    );
    // The slow lookup was cancelled before it could be stored
    assert_eq!(resolver.records().get(&FilmSlug::from("a")).unwrap(), None);
}

#[tokio::test]
async fn test_skip_failed_policy_returns_remaining_films() {
    let server = MockServer::start().await;
    mount_catalog_with_broken_poster(&server, Duration::ZERO).await;

    let mut config = create_test_config(&server.uri(), ":memory:");
    config.catalog.failure_policy = FailurePolicy::SkipFailed;
    let resolver = in_memory_resolver(config, Duration::from_secs(60));

    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();
    assert_eq!(names(&records), vec!["A", "C"]);
}

#[tokio::test]
async fn test_listing_failure_fails_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}page/1/", LIST_PATH)))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_secs(60),
    );
    let err = resolver.resolve_catalog(CatalogType::Top).await.unwrap_err();

    assert!(err.is_fetch());
    assert!(resolver.slug_cache().get(CatalogType::Top).await.is_none());
}

#[tokio::test]
async fn test_expired_slug_list_is_paginated_again() {
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["ran"], None, 2).await;
    mount_film(&server, "ran", "Ran", Some("tt0089881"), Duration::ZERO, Some(1)).await;

    let resolver = in_memory_resolver(
        create_test_config(&server.uri(), ":memory:"),
        Duration::from_millis(100),
    );

    resolver.resolve_catalog(CatalogType::Top).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    // The listing is fetched twice, the film only once
    assert_eq!(names(&records), vec!["Ran"]);
}

#[tokio::test]
async fn test_records_survive_resolver_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("records.db");
    let db_path = db_path.to_str().expect("Non UTF-8 temp path");

    {
        let server = MockServer::start().await;
        mount_listing(&server, LIST_PATH, 1, &["ikiru"], None, 1).await;
        mount_film(&server, "ikiru", "Ikiru", Some("tt0044741"), Duration::ZERO, Some(1)).await;

        let resolver = CatalogResolver::open(create_test_config(&server.uri(), db_path))
            .expect("Failed to open resolver");
        resolver.resolve_catalog(CatalogType::Top).await.unwrap();
        resolver.shutdown().unwrap();
    }

    // A fresh process: empty slug-list cache, same record cache file
    let server = MockServer::start().await;
    mount_listing(&server, LIST_PATH, 1, &["ikiru"], None, 1).await;
    mount_film(&server, "ikiru", "Ikiru", Some("tt0044741"), Duration::ZERO, Some(0)).await;

    let resolver = CatalogResolver::open(create_test_config(&server.uri(), db_path))
        .expect("Failed to reopen resolver");
    let records = resolver.resolve_catalog(CatalogType::Top).await.unwrap();

    assert_eq!(names(&records), vec!["Ikiru"]);
    assert_eq!(records[0].id.as_deref(), Some("tt0044741"));
}

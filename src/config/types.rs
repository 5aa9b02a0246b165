use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
}

/// Remote site layout
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host of the site (e.g., "https://letterboxd.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the list to scrape, with leading and trailing slash
    #[serde(rename = "list-path")]
    pub list_path: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

/// HTTP client limits
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Total timeout per request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout per request (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum redirects followed for a single request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Catalog resolution behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Upper bound on listing pages fetched per catalog
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum number of films resolved concurrently
    #[serde(rename = "max-concurrent-films", default = "default_max_concurrent_films")]
    pub max_concurrent_films: u32,

    /// Lifetime of a cached slug list (seconds)
    #[serde(rename = "slug-ttl-secs", default = "default_slug_ttl_secs")]
    pub slug_ttl_secs: u64,

    /// What to do when a single film fails to resolve
    #[serde(rename = "failure-policy", default)]
    pub failure_policy: FailurePolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_concurrent_films: default_max_concurrent_films(),
            slug_ttl_secs: default_slug_ttl_secs(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Handling of per-film failures during catalog resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// The first failing film fails the whole catalog; in-flight lookups are cancelled
    #[default]
    FailFast,

    /// Failing films are logged and left out of the catalog
    SkipFailed,
}

/// Persistent record cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Records older than this are treated as missing; unset means never
    #[serde(rename = "record-max-age-hours", default)]
    pub record_max_age_hours: Option<u64>,
}

/// Upper bound on `record-max-age-hours` (about a century)
pub const MAX_RECORD_AGE_HOURS: u64 = 876_000;

impl CacheConfig {
    /// The configured record max age, clamped to `MAX_RECORD_AGE_HOURS`
    pub fn record_max_age(&self) -> Option<chrono::Duration> {
        self.record_max_age_hours
            .map(|hours| chrono::Duration::hours(hours.min(MAX_RECORD_AGE_HOURS) as i64))
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_pages() -> u32 {
    50
}

fn default_max_concurrent_films() -> u32 {
    32
}

fn default_slug_ttl_secs() -> u64 {
    6 * 60 * 60
}

use crate::config::types::{
    CacheConfig, CatalogConfig, Config, HttpConfig, SiteConfig, UserAgentConfig,
    MAX_RECORD_AGE_HOURS,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    validate_catalog_config(&config.catalog)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if !config.list_path.starts_with('/') || !config.list_path.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "list-path must start and end with '/', got '{}'",
            config.list_path
        )));
    }

    if config.list_path.len() < 2 {
        return Err(ConfigError::Validation(
            "list-path cannot be the site root".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client-name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    if config.client_version.is_empty() {
        return Err(ConfigError::Validation(
            "client-version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 1000 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and 1000, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_films < 1 || config.max_concurrent_films > 256 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-films must be between 1 and 256, got {}",
            config.max_concurrent_films
        )));
    }

    if config.slug_ttl_secs < 1 {
        return Err(ConfigError::Validation(
            "slug-ttl-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.record_max_age_hours == Some(0) {
        return Err(ConfigError::Validation(
            "record-max-age-hours must be >= 1 when set".to_string(),
        ));
    }

    if let Some(hours) = config.record_max_age_hours {
        if hours > MAX_RECORD_AGE_HOURS {
            return Err(ConfigError::Validation(format!(
                "record-max-age-hours must be <= {}, got {}",
                MAX_RECORD_AGE_HOURS, hours
            )));
        }
    }

    Ok(())
}

/// Checks that a value is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made against the remote site:
//! - Building the HTTP client with a proper user agent and timeouts
//! - GET requests returning the body as text
//! - Parsing bodies into selector-queryable documents
//! - Error classification (transport, status, timeout, non-markup body)
//!
//! There is no caching and no retry logic here; every failure is returned to the
//! caller with the URL that caused it.

use crate::config::{HttpConfig, UserAgentConfig};
use crate::CatalogError;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use scraper::Html;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `http` - Timeouts and redirect limits
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    // Format: ClientName/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        user_agent.client_name, user_agent.client_version, user_agent.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .redirect(Policy::limited(http.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages and parses them into documents
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    /// Wraps an HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL and returns the full response body
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request timed out | `CatalogError::Timeout` |
    /// | Connection / transport failure | `CatalogError::Fetch` |
    /// | Non-2xx status | `CatalogError::Status` |
    /// | Declared content type is not markup | `CatalogError::Parse` |
    pub async fn fetch_text(&self, url: &str) -> Result<String, CatalogError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_markup(content_type) {
                return Err(CatalogError::Parse {
                    url: url.to_string(),
                    message: format!("expected HTML, got {}", content_type),
                });
            }
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }

    /// Fetches a URL and parses the body into a document tree
    pub async fn fetch_document(&self, url: &str) -> Result<Html, CatalogError> {
        let body = self.fetch_text(url).await?;
        Ok(Html::parse_document(&body))
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> CatalogError {
    if error.is_timeout() {
        CatalogError::Timeout {
            url: url.to_string(),
        }
    } else {
        CatalogError::Fetch {
            url: url.to_string(),
            source: error,
        }
    }
}

fn is_markup(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("html") || content_type.contains("xml")
}

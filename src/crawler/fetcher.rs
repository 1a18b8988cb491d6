//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests bounded by a per-request timeout
//! - Transparent redirect following
//! - Error classification

use crate::config::UserAgentConfig;
use crate::{FetchError, FetchResult};
use reqwest::{redirect::Policy, Client};
use std::ops::Range;
use std::time::Duration;

/// Final status codes that count as a successful fetch
const SUCCESS_STATUS: Range<u16> = 200..400;

/// Maximum redirect hops followed before the fetch is abandoned
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use ripple_sitemap::config::UserAgentConfig;
/// use ripple_sitemap::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "RippleSitemap".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// Redirects are followed by the client; the status of the final response
/// decides the outcome. The timeout covers connecting, sending and reading
/// the whole body.
///
/// | Condition | Result |
/// |-----------|--------|
/// | Final status 200-399, body read | `Ok(body)` |
/// | Final status outside 200-399 | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection refused, DNS, TLS | `FetchError::Connect` |
/// | Too many redirects, body decode, other | `FetchError::Http` |
///
/// There are no retries.
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> FetchResult<String> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status().as_u16();
    if !SUCCESS_STATUS.contains(&status) {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    if response.url().as_str() != url {
        tracing::trace!("{} redirected to {}", url, response.url());
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

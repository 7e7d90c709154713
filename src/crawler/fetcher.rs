//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the crawler:
//! - Building the HTTP client with a descriptive user agent string
//! - GET requests for search fragments and detail pages
//! - Binary downloads for media files
//! - Error classification
//!
//! Nothing here retries; a failed request is reported once and the caller
//! moves on.

use crate::config::UserAgentConfig;
use crate::RippleError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body decoded as text
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body decode failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Formats the crawler's user agent string
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use dict_ripple::config::UserAgentConfig;
/// use dict_ripple::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "DictRipple".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL as UTF-8 text
///
/// The body is always decoded as UTF-8 whatever charset the server declares;
/// invalid sequences become U+FFFD.
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Success` |
/// | Any other status | `HttpError` |
/// | Timeout / connect failure / body error | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.bytes().await {
        Ok(bytes) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Downloads a URL as raw bytes
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, RippleError> {
    let response = client.get(url).send().await.map_err(|source| RippleError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(RippleError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| RippleError::Http {
        url: url.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}

fn classify_network_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

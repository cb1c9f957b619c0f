//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client from `[http]` configuration
//! - GET requests for listing and detail pages
//! - Error classification for logging
//!
//! There is no retry. Any transport error or non-success status is returned to
//! the coordinator, which stops the run.

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use term_harvest::config::HttpConfig;
/// use term_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches page bodies, one request at a time
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches a page and returns its body as text
    ///
    /// # Errors
    ///
    /// * [`HarvestError::Http`] - connection, timeout or body decoding failure
    /// * [`HarvestError::Status`] - the server answered with a non-2xx status
    pub async fn fetch_page(&self, url: &Url) -> Result<String, HarvestError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| transport_error(url, e))
    }
}

fn transport_error(url: &Url, source: reqwest::Error) -> HarvestError {
    if source.is_timeout() {
        tracing::warn!("Request timeout for {}", url);
    } else if source.is_connect() {
        tracing::warn!("Connection failed for {}", url);
    }

    HarvestError::Http {
        url: url.to_string(),
        source,
    }
}

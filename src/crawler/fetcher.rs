//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made against the documentation
//! server:
//! - Building the shared HTTP client
//! - GET requests for HTML pages (decoded leniently)
//! - GET requests for raw asset bytes
//! - Error classification

use crate::state::PackageError;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors produced by a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, reset, timed out, ...
    #[error("request to {url} failed: {source}")]
    Network { url: String, source: reqwest::Error },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl From<FetchError> for PackageError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Network { .. } => PackageError::Fetch(error.to_string()),
            FetchError::Status { status, .. } => PackageError::Status(status),
        }
    }
}

/// Builds the HTTP client shared by every crawl task
///
/// No overall request timeout is set: the documentation server is local and
/// large package pages can take a while to render.
///
/// # Example
///
/// ```no_run
/// use godocset::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("godocset/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

async fn get(client: &Client, url: &Url) -> Result<reqwest::Response, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Fetches raw bytes, used for leaf assets
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let response = get(client, url).await?;
    let body = response.bytes().await.map_err(|source| FetchError::Network {
        url: url.to_string(),
        source,
    })?;
    Ok(body.to_vec())
}

/// Fetches an HTML page as text
///
/// The body is decoded with the response charset (UTF-8 by default); invalid
/// sequences become U+FFFD instead of failing the fetch.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = get(client, url).await?;
    response.text().await.map_err(|source| FetchError::Network {
        url: url.to_string(),
        source,
    })
}

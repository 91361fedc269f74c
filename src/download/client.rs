//! HTTP client wrapper for fetching pages and images.
//!
//! This module provides the `HttpClient` struct which performs the three
//! kinds of request the tool makes: the root page GET, the image GET and the
//! optional HEAD probe for an image's content type.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for page and image requests.
///
/// Create once and reuse for the whole run to share the connection pool.
///
/// # Example
///
/// ```no_run
/// use imgfetch_core::download::HttpClient;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let image = client.fetch(&Url::parse("https://example.com/cat.png")?).await?;
/// println!("{} bytes, type {:?}", image.bytes.len(), image.content_type);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// Raw body and declared media type of a fetched image.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Response body, untouched.
    pub bytes: Vec<u8>,
    /// `Content-Type` header value, if the server sent a readable one.
    pub content_type: Option<String>,
}

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative references resolve against it.
    pub url: Url,
    /// Decoded response body.
    pub body: String,
    /// `Content-Type` header value, if present.
    pub content_type: Option<String>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches an image and returns its raw bytes.
    ///
    /// The body is never interpreted: a server claiming `text/html` for an
    /// image still yields the exact bytes it sent.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL scheme is not http or https
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - The body stream breaks before completion
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<FetchedImage, DownloadError> {
        let response = self.send_request(Method::GET, url).await?;
        let content_type = content_type_of(&response);
        let bytes = read_body(response, url.as_str()).await?;
        debug!(bytes = bytes.len(), content_type = ?content_type, "image fetched");
        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }

    /// Asks the server for an image's content type without downloading it.
    ///
    /// # Errors
    ///
    /// Same conditions as [`fetch`](Self::fetch), minus body streaming.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn probe_content_type(&self, url: &Url) -> Result<Option<String>, DownloadError> {
        let response = self.send_request(Method::HEAD, url).await?;
        let content_type = content_type_of(&response);
        debug!(content_type = ?content_type, "content type probed");
        Ok(content_type)
    }

    /// Fetches an HTML page as text.
    ///
    /// # Errors
    ///
    /// Same conditions as [`fetch`](Self::fetch).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, DownloadError> {
        let response = self.send_request(Method::GET, url).await?;
        let final_url = response.url().clone();
        let content_type = content_type_of(&response);
        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?;
        debug!(final_url = %final_url, bytes = body.len(), "page fetched");
        Ok(FetchedPage {
            url: final_url,
            body,
            content_type,
        })
    }

    async fn send_request(&self, method: Method, url: &Url) -> Result<Response, DownloadError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DownloadError::invalid_url(url.as_str()));
        }

        let response = self
            .client
            .request(method, url.clone())
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
        }

        Ok(response)
    }
}

fn content_type_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Collects the response body chunk by chunk.
async fn read_body(response: Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0);
    let mut bytes = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

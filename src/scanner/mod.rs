//! Page scanning: fetch the root page and list the images it embeds.
//!
//! # Example
//!
//! ```no_run
//! use imgfetch_core::download::HttpClient;
//! use imgfetch_core::scanner::{PageScanner, parse_page_url};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let root = parse_page_url("https://example.com/gallery")?;
//! let scanner = PageScanner::new(HttpClient::new());
//! for image in scanner.scan(&root).await? {
//!     println!("{image}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod html;

pub use error::{ScanError, UrlError};
pub use html::extract_image_urls;

use std::fmt;

use tracing::{info, instrument};
use url::Url;

use crate::download::HttpClient;

/// Absolute URL of an image discovered on the scanned page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference(Url);

impl ImageReference {
    /// Wraps an absolute URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    /// Returns the underlying URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Validates the page URL supplied by the user.
///
/// Only absolute `http`/`https` URLs with a host are accepted.
///
/// # Errors
///
/// Returns [`UrlError::InvalidUrl`] describing why the input was rejected.
pub fn parse_page_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|e| UrlError::malformed(trimmed, &e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::unsupported_scheme(trimmed, url.scheme()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::no_host(trimmed));
    }
    Ok(url)
}

/// Fetches a page and extracts its image references.
#[derive(Debug, Clone)]
pub struct PageScanner {
    client: HttpClient,
}

impl PageScanner {
    /// Creates a scanner that fetches through `client`.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetches `root` and returns the absolute URL of every `<img src>` on it,
    /// in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Fetch`] if the page cannot be fetched and
    /// [`ScanError::NotHtml`] if the response is not a markup document.
    #[instrument(skip(self), fields(root = %root))]
    pub async fn scan(&self, root: &Url) -> Result<Vec<ImageReference>, ScanError> {
        let page = self
            .client
            .fetch_page(root)
            .await
            .map_err(|source| ScanError::Fetch {
                url: root.to_string(),
                source,
            })?;

        if !html::is_markup_content_type(page.content_type.as_deref()) {
            return Err(ScanError::NotHtml {
                url: root.to_string(),
                content_type: page.content_type.unwrap_or_default(),
            });
        }

        let images = extract_image_urls(&page.body, &page.url);
        info!(images = images.len(), "page scanned");
        Ok(images)
    }
}

//! Error types for page URL validation and page scanning.

use thiserror::Error;

use crate::download::DownloadError;

/// The page URL given by the user cannot be scanned.
#[derive(Debug, Clone, Error)]
pub enum UrlError {
    /// URL is malformed or uses unsupported scheme
    #[error("invalid URL '{url}': {reason}\n  Suggestion: {suggestion}")]
    InvalidUrl {
        /// The URL that failed validation
        url: String,
        /// Why the URL is invalid
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },
}

impl UrlError {
    /// Creates an `InvalidUrl` error for a non-web URL scheme.
    #[must_use]
    pub fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("scheme '{scheme}' is not supported"),
            suggestion: "Use http:// or https:// URLs".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a malformed URL.
    #[must_use]
    pub fn malformed(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: parse_error.to_string(),
            suggestion: "Check the URL format and try again".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a URL without a host.
    #[must_use]
    pub fn no_host(url: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
            suggestion: "Ensure the URL includes a domain (e.g., example.com)".to_string(),
        }
    }
}

/// Fatal errors from scanning the root page. No images can be discovered.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root page could not be fetched.
    #[error("failed to fetch page {url}: {source}")]
    Fetch {
        /// The page URL.
        url: String,
        /// The underlying fetch error.
        #[source]
        source: DownloadError,
    },

    /// The root page was fetched but is not a markup document.
    #[error("page {url} is not HTML (content type '{content_type}')")]
    NotHtml {
        /// The page URL.
        url: String,
        /// The declared content type.
        content_type: String,
    },
}

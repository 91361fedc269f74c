//! Image download: filename resolution, HTTP fetching and the batch runner.
//!
//! # Features
//!
//! - Filenames from the URL's last path segment, sanitised for the filesystem
//! - Extension inference from `image/*` content types when the URL has none
//! - Raw-byte fetching regardless of the declared content type
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Per-image failure isolation: one bad image never aborts the batch
//!
//! # Example
//!
//! ```no_run
//! use imgfetch_core::download::{HttpClient, resolve_filename};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let url = Url::parse("https://example.com/avatar?size=64")?;
//! let image = client.fetch(&url).await?;
//! let name = resolve_filename(&url, image.content_type.as_deref());
//! std::fs::write(name.as_str(), &image.bytes)?;
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
pub mod constants;
mod error;
mod filename;

pub use batch::{
    BatchDownloader, BatchReporter, DownloadResult, DownloadSummary, ExtensionInference,
    NoopReporter,
};
pub use client::{FetchedImage, FetchedPage, HttpClient};
pub use error::DownloadError;
pub use filename::{ResolvedFilename, needs_content_type, resolve_filename};

// Note: no module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.

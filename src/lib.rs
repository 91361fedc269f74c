//! imgfetch core library
//!
//! Fetches a single web page, finds every `<img src>` on it and saves each
//! image into a local folder under a safe, correctly-extensioned name.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`scanner`] - Root page fetching and image URL extraction
//! - [`download`] - Filename resolution, image fetching and the batch runner

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod scanner;
mod user_agent;

// Re-export commonly used types
pub use download::{
    BatchDownloader, BatchReporter, DownloadError, DownloadResult, DownloadSummary,
    ExtensionInference, HttpClient, NoopReporter, ResolvedFilename, resolve_filename,
};
pub use scanner::{ImageReference, PageScanner, ScanError, UrlError, parse_page_url};

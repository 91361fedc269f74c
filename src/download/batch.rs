//! Batch downloader: scan a page, then save each of its images in turn.
//!
//! Images are processed one at a time in discovery order. A failure while
//! fetching or writing one image is recorded in that image's
//! [`DownloadResult`] and the batch moves on; only a failure to scan the root
//! page aborts the run.
//!
//! # Example
//!
//! ```no_run
//! use imgfetch_core::download::{BatchDownloader, DownloadSummary, HttpClient, NoopReporter};
//! use std::path::Path;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = BatchDownloader::new(HttpClient::new());
//! let root = Url::parse("https://example.com/gallery")?;
//! let results = downloader.run(&root, Path::new("./images"), &NoopReporter).await?;
//! let summary = DownloadSummary::from_results(&results);
//! println!("Saved: {}, Failed: {}", summary.saved(), summary.failed());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::FetchedImage;
use super::filename::{ResolvedFilename, needs_content_type, resolve_filename};
use super::{DownloadError, HttpClient};
use crate::scanner::{ImageReference, PageScanner, ScanError};

/// Where the content type used for extension inference comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtensionInference {
    /// Reuse the `Content-Type` of the image GET response.
    #[default]
    FromResponse,
    /// Send a HEAD probe before the GET, for URLs without a known extension.
    Probe,
}

/// Outcome of saving one image.
#[derive(Debug)]
pub enum DownloadResult {
    /// The image was written to disk.
    Saved {
        /// The image URL.
        image: ImageReference,
        /// The name it was saved under.
        filename: ResolvedFilename,
        /// Full path of the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes_written: u64,
    },
    /// The image could not be fetched or written.
    Failed {
        /// The image URL.
        image: ImageReference,
        /// The name it would have been saved under, if it got that far.
        filename: Option<ResolvedFilename>,
        /// Why it failed.
        error: DownloadError,
    },
}

impl DownloadResult {
    /// The image this result is about.
    #[must_use]
    pub fn image(&self) -> &ImageReference {
        match self {
            Self::Saved { image, .. } | Self::Failed { image, .. } => image,
        }
    }

    /// Returns true if the image was saved.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Counts derived from a batch's results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    saved: usize,
    failed: usize,
    bytes_written: u64,
}

impl DownloadSummary {
    /// Tallies a slice of results.
    #[must_use]
    pub fn from_results(results: &[DownloadResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut summary, result| {
                match result {
                    DownloadResult::Saved { bytes_written, .. } => {
                        summary.saved += 1;
                        summary.bytes_written += bytes_written;
                    }
                    DownloadResult::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }

    /// Returns the number of saved images.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved
    }

    /// Returns the number of failed images.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Returns the total number of images processed (saved + failed).
    #[must_use]
    pub fn total(&self) -> usize {
        self.saved + self.failed
    }

    /// Returns the total bytes written across saved images.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Receives progress events from a batch run.
///
/// Both methods default to doing nothing.
pub trait BatchReporter: Send + Sync {
    /// Called once the page has been scanned, with the number of images found.
    fn on_scan_complete(&self, _images: usize) {}

    /// Called after each image has been processed.
    fn on_result(&self, _result: &DownloadResult) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl BatchReporter for NoopReporter {}

/// Downloads every image on a page into a folder, sequentially.
#[derive(Debug, Clone)]
pub struct BatchDownloader {
    client: HttpClient,
    scanner: PageScanner,
    inference: ExtensionInference,
}

impl BatchDownloader {
    /// Creates a downloader that reuses response content types for
    /// extension inference.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            scanner: PageScanner::new(client.clone()),
            client,
            inference: ExtensionInference::default(),
        }
    }

    /// Selects where content types for extension inference come from.
    #[must_use]
    pub fn with_extension_inference(mut self, inference: ExtensionInference) -> Self {
        self.inference = inference;
        self
    }

    /// Returns the configured extension inference mode.
    #[must_use]
    pub fn extension_inference(&self) -> ExtensionInference {
        self.inference
    }

    /// Scans `root` and saves every image it references into `download_folder`.
    ///
    /// Returns one [`DownloadResult`] per discovered image, in discovery order.
    /// Existing files with the same name are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the root page cannot be fetched or is not
    /// HTML. Individual image failures do NOT cause this method to error.
    #[instrument(skip(self, reporter), fields(root = %root, folder = %download_folder.display()))]
    pub async fn run(
        &self,
        root: &Url,
        download_folder: &Path,
        reporter: &dyn BatchReporter,
    ) -> Result<Vec<DownloadResult>, ScanError> {
        let images = self.scanner.scan(root).await?;
        reporter.on_scan_complete(images.len());

        let mut results = Vec::with_capacity(images.len());
        for image in images {
            let result = self.download_one(image, download_folder).await;
            reporter.on_result(&result);
            results.push(result);
        }

        let summary = DownloadSummary::from_results(&results);
        info!(
            saved = summary.saved(),
            failed = summary.failed(),
            bytes = summary.bytes_written(),
            "batch complete"
        );
        Ok(results)
    }

    /// Resolves, fetches and writes a single image.
    #[instrument(skip(self, download_folder), fields(url = %image))]
    pub async fn download_one(&self, image: ImageReference, download_folder: &Path) -> DownloadResult {
        let probed = self.probe_if_needed(image.url()).await;

        let fetched = match self.client.fetch(image.url()).await {
            Ok(fetched) => fetched,
            Err(error) => {
                warn!(url = %image, error = %error, "image fetch failed");
                return DownloadResult::Failed {
                    image,
                    filename: None,
                    error,
                };
            }
        };

        let content_type = match self.inference {
            ExtensionInference::Probe => probed,
            ExtensionInference::FromResponse => fetched.content_type.clone(),
        };
        let filename = resolve_filename(image.url(), content_type.as_deref());
        let path = download_folder.join(&filename);
        debug!(filename = %filename, path = %path.display(), "resolved output path");

        match write_image(&path, &fetched).await {
            Ok(bytes_written) => {
                info!(path = %path.display(), bytes = bytes_written, "image saved");
                DownloadResult::Saved {
                    image,
                    filename,
                    path,
                    bytes_written,
                }
            }
            Err(error) => {
                warn!(url = %image, filename = %filename, error = %error, "image write failed");
                DownloadResult::Failed {
                    image,
                    filename: Some(filename),
                    error,
                }
            }
        }
    }

    /// HEAD-probes the content type when configured to and the URL needs one.
    /// A failed probe is logged and treated as "no content type".
    async fn probe_if_needed(&self, url: &Url) -> Option<String> {
        if self.inference != ExtensionInference::Probe || !needs_content_type(url) {
            return None;
        }
        match self.client.probe_content_type(url).await {
            Ok(content_type) => content_type,
            Err(error) => {
                warn!(url = %url, error = %error, "content type probe failed; saving without inferred extension");
                None
            }
        }
    }
}

/// Writes the image bytes, replacing any existing file. A partially written
/// file is removed on error.
async fn write_image(path: &Path, image: &FetchedImage) -> Result<u64, DownloadError> {
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let write = async {
        writer.write_all(&image.bytes).await?;
        writer.flush().await
    };

    let written = write.await;
    drop(writer);

    if let Err(e) = written {
        debug!(path = %path.display(), "cleaning up partial file after error");
        if let Err(remove_err) = tokio::fs::remove_file(path).await
            && remove_err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), error = %remove_err, "failed to remove partial file");
        }
        return Err(DownloadError::io(path, e));
    }

    Ok(image.bytes.len() as u64)
}

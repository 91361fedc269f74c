//! Argument validation that must pass before any network activity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use imgfetch_core::parse_page_url;
use url::Url;

pub(crate) fn validate_page_url(input: &str) -> Result<Url> {
    Ok(parse_page_url(input)?)
}

/// Creates the download folder (and parents) if missing.
pub(crate) fn prepare_download_folder(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        if !path.is_dir() {
            bail!(
                "Not a directory: {}\n  Suggestion: Choose a folder path, or remove the existing file",
                path.display()
            );
        }
        return Ok(path.to_path_buf());
    }

    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create download folder {}", path.display()))?;
    Ok(path.to_path_buf())
}

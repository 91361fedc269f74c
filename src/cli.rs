//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download every image embedded in a web page.
///
/// Fetches the page at URL, finds each <img src> on it and saves the images
/// into DOWNLOAD_FOLDER, inferring missing extensions from the content type.
#[derive(Parser, Debug)]
#[command(name = "imgfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Page to scan for images (http or https)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Folder to save images into (created if missing)
    #[arg(value_name = "DOWNLOAD_FOLDER")]
    pub download_folder: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Send a HEAD request for the content type of extensionless images
    /// instead of reusing the download response's header
    #[arg(long)]
    pub probe_content_type: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

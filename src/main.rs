//! CLI entry point for imgfetch.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use imgfetch_core::{BatchDownloader, DownloadResult, DownloadSummary, ExtensionInference, HttpClient};
use tracing::{debug, info};

mod cli;
mod progress;
mod validation;

use cli::Args;
use progress::ProgressReporter;

/// Process exit outcome for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    /// Every image saved, or the page had none.
    Success,
    /// Some images saved, some failed.
    Partial,
    /// Every image failed, or the run could not start.
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => Self::SUCCESS,
            ProcessExit::Partial => Self::from(1_u8),
            ProcessExit::Failure => Self::from(2_u8),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ProcessExit::Failure.into()
        }
    }
}

async fn run(args: &Args) -> Result<ProcessExit> {
    debug!(?args, "CLI arguments parsed");

    let root = validation::validate_page_url(&args.url)?;
    let download_folder = validation::prepare_download_folder(&args.download_folder)?;

    info!(url = %root, folder = %download_folder.display(), "imgfetch starting");

    let inference = if args.probe_content_type {
        ExtensionInference::Probe
    } else {
        ExtensionInference::FromResponse
    };
    let downloader = BatchDownloader::new(HttpClient::new()).with_extension_inference(inference);

    let show_progress = !args.quiet && !args.no_progress && io::stderr().is_terminal();
    let reporter = ProgressReporter::new(show_progress);
    let results = downloader.run(&root, &download_folder, &reporter).await;
    reporter.finish();
    let results = results?;

    let summary = DownloadSummary::from_results(&results);
    if !args.quiet {
        print_summary(&results, &summary);
    }

    Ok(determine_exit_outcome(&summary))
}

fn print_summary(results: &[DownloadResult], summary: &DownloadSummary) {
    for result in results {
        if let DownloadResult::Failed {
            image,
            filename,
            error,
        } = result
        {
            match filename {
                Some(filename) => println!("  failed: {image} -> {filename}\n    {error}"),
                None => println!("  failed: {image}\n    {error}"),
            }
        }
    }
    println!(
        "Saved {} of {} images ({} bytes), {} failed",
        summary.saved(),
        summary.total(),
        summary.bytes_written(),
        summary.failed()
    );
}

fn determine_exit_outcome(summary: &DownloadSummary) -> ProcessExit {
    if summary.failed() == 0 {
        ProcessExit::Success
    } else if summary.saved() > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgfetch_core::{DownloadError, ImageReference, resolve_filename};
    use std::path::PathBuf;
    use url::Url;

    fn saved() -> DownloadResult {
        let url = Url::parse("https://example.com/a.png").unwrap();
        DownloadResult::Saved {
            filename: resolve_filename(&url, None),
            image: ImageReference::new(url),
            path: PathBuf::from("a.png"),
            bytes_written: 1,
        }
    }

    fn failed() -> DownloadResult {
        DownloadResult::Failed {
            image: ImageReference::new(Url::parse("https://example.com/b.png").unwrap()),
            filename: None,
            error: DownloadError::http_status("https://example.com/b.png", 404),
        }
    }

    fn outcome(results: &[DownloadResult]) -> ProcessExit {
        determine_exit_outcome(&DownloadSummary::from_results(results))
    }

    #[test]
    fn test_exit_outcome_success_when_no_failures() {
        assert_eq!(outcome(&[saved(), saved()]), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_success_when_page_has_no_images() {
        assert_eq!(outcome(&[]), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_partial_when_mixed() {
        assert_eq!(outcome(&[saved(), failed()]), ProcessExit::Partial);
    }

    #[test]
    fn test_exit_outcome_failure_when_all_failed() {
        assert_eq!(outcome(&[failed(), failed()]), ProcessExit::Failure);
    }
}

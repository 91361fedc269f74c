//! Progress bar for batch runs.

use std::time::Duration;

use imgfetch_core::{BatchReporter, DownloadResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Drives an indicatif bar from batch events.
pub(crate) struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Creates the reporter; a hidden bar when `enabled` is false.
    pub(crate) fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Scanning page...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl BatchReporter for ProgressReporter {
    fn on_scan_complete(&self, images: usize) {
        self.bar.disable_steady_tick();
        self.bar.set_length(images as u64);
        self.bar.set_position(0);
        self.bar.set_style(
            ProgressStyle::with_template("[{pos}/{len}] {wide_bar} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
    }

    fn on_result(&self, result: &DownloadResult) {
        let host = result.image().url().host_str().unwrap_or("image").to_string();
        self.bar.set_message(host);
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_reporter_tracks_position() {
        let reporter = ProgressReporter::new(false);
        reporter.on_scan_complete(3);
        assert_eq!(reporter.bar.length(), Some(3));
        assert_eq!(reporter.bar.position(), 0);
        reporter.finish();
    }
}

//! Progress indicator for the raw data scan.
//!
//! The scan does not know its file count up front, so it uses a spinner that
//! reports how many files have been visited. Nothing is drawn unless stderr
//! is an interactive terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{IsTerminal, stderr};
use std::time::Duration;

/// Check if we should show progress indicators.
#[must_use]
pub fn should_show_progress() -> bool {
    stderr().is_terminal()
}

/// Create a spinner for indeterminate operations.
///
/// # Panics
/// Panics if the spinner template string is invalid.
#[must_use]
pub fn create_spinner(message: &str, show: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    if show {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {pos} files {msg}")
                .expect("valid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb
}

/// Spinner wrapper counting visited files during a scan.
pub struct ScanProgress {
    bar: ProgressBar,
    showing: bool,
}

impl ScanProgress {
    /// Start a spinner, visible only on a terminal.
    #[must_use]
    pub fn start(message: &str) -> Self {
        Self::with_visibility(message, should_show_progress())
    }

    /// Start a spinner with explicit visibility.
    #[must_use]
    pub fn with_visibility(message: &str, show: bool) -> Self {
        Self {
            bar: create_spinner(message, show),
            showing: show,
        }
    }

    /// Record one visited file and show its path.
    pub fn file_visited(&self, path: &str) {
        self.bar.inc(1);
        if self.showing {
            self.bar.set_message(path.to_string());
        }
    }

    /// Finish and clear the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
